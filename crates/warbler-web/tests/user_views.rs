mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn signup_creates_the_user_and_a_session() {
    let (app, state) = app();

    let response = send(
        &app,
        post_form(
            "/signup",
            "username=newuser&email=newuser%40test.com&password=newpassword&location=The+nest",
            &[],
        ),
    )
    .await;

    assert!(response.status().is_redirection());
    let session = cookie_pair(&response, "warbler_session").expect("session cookie");

    let user = state
        .db
        .get_user_by_username("newuser")
        .unwrap()
        .expect("created user");
    assert_eq!(user.email, "newuser@test.com");
    assert_ne!(user.password, "newpassword");

    // The fresh session cookie resolves to the new user's profile.
    let profile = send(&app, get(&format!("/users/{}", user.id), &[session])).await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert!(body_text(profile).await.contains("@newuser"));
}

#[tokio::test]
async fn signup_with_a_missing_field_rerenders_keeping_values() {
    let (app, state) = app();

    // No location: the form is invalid, the page comes back with the
    // entered email preserved, and nothing is written.
    let response = send(
        &app,
        post_form(
            "/signup",
            "username=newuser&email=newuser%40test.com&password=newpassword&image_url=",
            &[],
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="newuser@test.com""#));
    assert!(state.db.get_user_by_username("newuser").unwrap().is_none());
}

#[tokio::test]
async fn signup_with_a_taken_username_keeps_the_original_row() {
    let (app, state) = app();
    seed_user(&state, "testpotato", "test@test.com", "testuser");

    let response = send(
        &app,
        post_form(
            "/signup",
            "username=testpotato&email=other%40test.com&password=newpassword&location=nest",
            &[],
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Username already taken"));

    let original = state
        .db
        .get_user_by_username("testpotato")
        .unwrap()
        .expect("original row");
    assert_eq!(original.email, "test@test.com");
}

#[tokio::test]
async fn login_sets_a_session_and_greets_the_user() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");

    let response = send(
        &app,
        post_form("/login", "username=testpotato&password=testuser", &[]),
    )
    .await;
    assert!(response.status().is_redirection());

    let session = cookie_pair(&response, "warbler_session").expect("session cookie");
    let session_id = session.split_once('=').unwrap().1.to_string();
    let resolved = state
        .db
        .session_user(&session_id)
        .unwrap()
        .expect("session user");
    assert_eq!(resolved.id, user.id);

    let home = follow_redirect(&app, response, &[]).await;
    assert_eq!(home.status(), StatusCode::OK);
    let html = body_text(home).await;
    assert!(html.contains("Hello, testpotato!"));
    assert!(html.contains("@testpotato"));
}

#[tokio::test]
async fn login_with_bad_credentials_rerenders() {
    let (app, state) = app();
    seed_user(&state, "testpotato", "test@test.com", "testuser");

    let response = send(
        &app,
        post_form("/login", "username=testpotato&password=badpassword", &[]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid credentials."));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let cookie = login_cookie(&state, &user.id);
    let session_id = cookie.split_once('=').unwrap().1.to_string();

    let response = send(&app, get("/logout", std::slice::from_ref(&cookie))).await;
    assert!(response.status().is_redirection());
    assert!(state.db.session_user(&session_id).unwrap().is_none());

    let login_page = follow_redirect(&app, response, &[]).await;
    assert_eq!(login_page.status(), StatusCode::OK);
    let html = body_text(login_page).await;
    assert!(html.contains("You have successfully logged out."));
    assert!(html.contains("Sign up"));
}

#[tokio::test]
async fn users_index_lists_everyone() {
    let (app, state) = app();
    seed_user(&state, "testpotato", "test@test.com", "testuser");
    seed_user(&state, "testuser2", "test2@test.com", "testuser2");

    let response = send(&app, get("/users", &[])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("testpotato"));
    assert!(html.contains("testuser2"));
}

#[tokio::test]
async fn users_index_search_filters_by_username() {
    let (app, state) = app();
    seed_user(&state, "testpotato", "test@test.com", "testuser");
    seed_user(&state, "testuser2", "test2@test.com", "testuser2");

    let response = send(&app, get("/users?q=potato", &[])).await;
    let html = body_text(response).await;
    assert!(html.contains("testpotato"));
    assert!(!html.contains("testuser2"));
}

#[tokio::test]
async fn profile_page_renders_the_handle() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");

    let response = send(&app, get(&format!("/users/{}", user.id), &[])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"<h4 id="sidebar-username">@testpotato</h4>"#));
}

#[tokio::test]
async fn unknown_profile_is_a_404() {
    let (app, _state) = app();

    let response = send(
        &app,
        get("/users/00000000-0000-0000-0000-000000000000", &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn following_page_is_blocked_when_logged_out() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    state.db.follow(&u1.id, &u2.id).unwrap();

    let response = send(&app, get(&format!("/users/{}/following", u1.id), &[])).await;
    assert!(response.status().is_redirection());

    let home = follow_redirect(&app, response, &[]).await;
    assert_eq!(home.status(), StatusCode::OK);
    let html = body_text(home).await;
    assert!(html.contains("Access unauthorized."));
    assert!(!html.contains("@testuser2"));
}

#[tokio::test]
async fn following_page_lists_followed_users_when_logged_in() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    state.db.follow(&u1.id, &u2.id).unwrap();
    let cookie = login_cookie(&state, &u1.id);

    let response = send(
        &app,
        get(
            &format!("/users/{}/following", u1.id),
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<p>@testuser2</p>"));
}

#[tokio::test]
async fn followers_page_shows_any_users_followers_when_logged_in() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    state.db.follow(&u1.id, &u2.id).unwrap();
    let cookie = login_cookie(&state, &u1.id);

    let response = send(
        &app,
        get(
            &format!("/users/{}/followers", u2.id),
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<p>@testpotato</p>"));
}

#[tokio::test]
async fn follow_endpoint_adds_the_edge() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    let cookie = login_cookie(&state, &u1.id);

    let response = send(
        &app,
        post_form(
            &format!("/users/follow/{}", u2.id),
            "",
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert!(response.status().is_redirection());
    assert!(state.db.is_following(&u1.id, &u2.id).unwrap());

    let response = send(
        &app,
        post_form(
            &format!("/users/stop-following/{}", u2.id),
            "",
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert!(response.status().is_redirection());
    assert!(!state.db.is_following(&u1.id, &u2.id).unwrap());
}

#[tokio::test]
async fn edit_profile_updates_the_row() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let cookie = login_cookie(&state, &user.id);

    let response = send(
        &app,
        post_form(
            "/users/profile",
            "username=updatedpotatoking&email=updated%40test.com&password=testuser",
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert!(response.status().is_redirection());

    let profile = follow_redirect(&app, response, std::slice::from_ref(&cookie)).await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert!(body_text(profile).await.contains("User Updated!"));

    let row = state.db.get_user_by_id(&user.id).unwrap().expect("row");
    assert_eq!(row.username, "updatedpotatoking");
    assert_eq!(row.email, "updated@test.com");
}

#[tokio::test]
async fn edit_profile_with_wrong_password_changes_nothing() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let cookie = login_cookie(&state, &user.id);

    let response = send(
        &app,
        post_form(
            "/users/profile",
            "username=updatedpotatoking&email=updated%40test.com&password=wrongpassword",
            std::slice::from_ref(&cookie),
        ),
    )
    .await;
    assert!(response.status().is_redirection());

    let home = follow_redirect(&app, response, std::slice::from_ref(&cookie)).await;
    assert!(body_text(home).await.contains("Access unauthorized."));

    let row = state.db.get_user_by_id(&user.id).unwrap().expect("row");
    assert_eq!(row.username, "testpotato");
}

#[tokio::test]
async fn deleting_the_account_removes_the_user() {
    let (app, state) = app();
    let user = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let cookie = login_cookie(&state, &user.id);

    let response = send(
        &app,
        post_form("/users/delete", "", std::slice::from_ref(&cookie)),
    )
    .await;
    assert!(response.status().is_redirection());

    let signup = follow_redirect(&app, response, &[]).await;
    assert_eq!(signup.status(), StatusCode::OK);
    assert!(body_text(signup).await.contains("Sign up"));

    assert!(state.db.get_user_by_id(&user.id).unwrap().is_none());
}

#[tokio::test]
async fn likes_page_is_blocked_when_logged_out() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    let message = state.db.insert_message(&u2.id, "A liked message").unwrap();
    state.db.toggle_like(&u1.id, &message.id).unwrap();

    let response = send(&app, get(&format!("/users/{}/likes", u1.id), &[])).await;
    assert!(response.status().is_redirection());

    let home = follow_redirect(&app, response, &[]).await;
    assert_eq!(home.status(), StatusCode::OK);
    let html = body_text(home).await;
    assert!(html.contains("Access unauthorized."));
    assert!(!html.contains("A liked message"));
}

#[tokio::test]
async fn likes_page_lists_liked_warbles_when_logged_in() {
    let (app, state) = app();
    let u1 = seed_user(&state, "testpotato", "test@test.com", "testuser");
    let u2 = seed_user(&state, "testuser2", "test2@test.com", "testuser2");
    let message = state.db.insert_message(&u2.id, "A liked message").unwrap();
    state.db.toggle_like(&u1.id, &message.id).unwrap();
    let cookie = login_cookie(&state, &u1.id);

    let response = send(
        &app,
        get(&format!("/users/{}/likes", u1.id), std::slice::from_ref(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("A liked message"));
}
