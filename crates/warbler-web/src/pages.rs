//! Thin maud templates. One layout, one function per page; rendering is
//! deliberately a dumb projection of what the handlers already decided.

use std::collections::HashSet;

use maud::{DOCTYPE, Markup, html};
use uuid::Uuid;

use warbler_db::models::UserStats;
use warbler_types::forms::{FieldErrors, LoginForm, MessageForm, SignupForm, UserEditForm};
use warbler_types::models::{Message, User};

use crate::flash::Flash;

fn layout(title: &str, actor: Option<&User>, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " / Warbler" }
                link rel="stylesheet" href="/static/stylesheets/style.css";
            }
            body {
                nav class="navbar" {
                    a class="brand" href="/" { "Warbler" }
                    ul class="nav-links" {
                        li { a href="/users" { "Users" } }
                        @if let Some(user) = actor {
                            li { a href=(format!("/users/{}", user.id)) { "@" (user.username) } }
                            li { a href="/messages/new" { "New Warble" } }
                            li { a href="/logout" { "Log out" } }
                        } @else {
                            li { a href="/signup" { "Sign up" } }
                            li { a href="/login" { "Log in" } }
                        }
                    }
                }
                @if let Some(flash) = flash {
                    div class=(format!("alert alert-{}", flash.category)) { (flash.message) }
                }
                main class="container" { (content) }
            }
        }
    }
}

fn error_list(errors: &FieldErrors) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul class="form-errors" {
                @for error in errors.iter() { li { (error.message) } }
            }
        }
    }
}

fn user_card(user: &User) -> Markup {
    html! {
        div class="user-card" {
            a href=(format!("/users/{}", user.id)) {
                img class="avatar" src=(user.image_url) alt=(user.username);
                p { "@" (user.username) }
            }
            @if let Some(bio) = &user.bio { p class="bio" { (bio) } }
        }
    }
}

fn message_card(message: &Message, liked: Option<&HashSet<Uuid>>) -> Markup {
    html! {
        article class="message-card" {
            a class="message-author" href=(format!("/users/{}", message.user_id)) {
                "@" (message.author_username)
            }
            span class="timestamp" { (message.timestamp.format("%d %B %Y").to_string()) }
            p class="message-text" {
                a href=(format!("/messages/{}", message.id)) { (message.text) }
            }
            @if let Some(liked) = liked {
                (like_button(message.id, liked.contains(&message.id)))
            }
        }
    }
}

fn like_button(message_id: Uuid, liked: bool) -> Markup {
    html! {
        form class="like-form" method="post" action=(format!("/users/add_like/{message_id}")) {
            button type="submit" class=(if liked { "btn-like liked" } else { "btn-like" }) {
                @if liked { "♥" } @else { "♡" }
            }
        }
    }
}

pub fn home_anon(flash: Option<&Flash>) -> Markup {
    layout("Home", None, flash, html! {
        div class="home-hero" {
            h1 { "What's Happening?" }
            p { "New to Warbler? Sign up to start warbling." }
            a class="btn btn-primary" href="/signup" { "Sign up now" }
        }
    })
}

pub fn home_timeline(
    user: &User,
    messages: &[Message],
    liked: &HashSet<Uuid>,
    flash: Option<&Flash>,
) -> Markup {
    layout("Home", Some(user), flash, html! {
        div class="row" {
            aside class="sidebar" {
                img class="avatar" src=(user.image_url) alt=(user.username);
                p { "@" (user.username) }
            }
            section class="timeline" {
                @if messages.is_empty() {
                    p class="empty" { "No warbles yet. Follow some users to fill your timeline." }
                }
                @for message in messages {
                    (message_card(message, Some(liked)))
                }
            }
        }
    })
}

pub fn signup_page(form: &SignupForm, errors: &FieldErrors, flash: Option<&Flash>) -> Markup {
    layout("Sign up", None, flash, html! {
        h2 { "Join Warbler today." }
        (error_list(errors))
        form class="stacked-form" method="post" action="/signup" {
            input type="text" name="username" value=(form.username) placeholder="Username";
            input type="text" name="email" value=(form.email) placeholder="E-mail";
            input type="password" name="password" value="" placeholder="Password";
            input type="text" name="location" value=(form.location) placeholder="Location";
            input type="text" name="bio" value=(form.bio) placeholder="(Optional) Bio";
            input type="text" name="image_url" value=(form.image_url) placeholder="(Optional) Image URL";
            button type="submit" class="btn btn-primary" { "Sign me up!" }
        }
    })
}

pub fn login_page(form: &LoginForm, errors: &FieldErrors, flash: Option<&Flash>) -> Markup {
    layout("Log in", None, flash, html! {
        h2 { "Welcome back." }
        (error_list(errors))
        form class="stacked-form" method="post" action="/login" {
            input type="text" name="username" value=(form.username) placeholder="Username";
            input type="password" name="password" value="" placeholder="Password";
            button type="submit" class="btn btn-primary" { "Log in" }
        }
    })
}

pub fn users_index(
    users: &[User],
    q: Option<&str>,
    viewer: Option<&User>,
    flash: Option<&Flash>,
) -> Markup {
    layout("Users", viewer, flash, html! {
        form class="search" method="get" action="/users" {
            input type="text" name="q" value=(q.unwrap_or("")) placeholder="Search Warbler";
            button type="submit" class="btn" { "Search" }
        }
        @if users.is_empty() {
            h3 { "Sorry, no users found" }
        }
        div class="user-grid" {
            @for user in users { (user_card(user)) }
        }
    })
}

#[allow(clippy::too_many_arguments)]
pub fn user_detail(
    user: &User,
    messages: &[Message],
    stats: &UserStats,
    viewer: Option<&User>,
    viewer_follows: bool,
    liked: Option<&HashSet<Uuid>>,
    flash: Option<&Flash>,
) -> Markup {
    let title = format!("@{}", user.username);
    layout(&title, viewer, flash, html! {
        header class="profile-header" {
            img class="profile-hero" src=(user.header_image_url) alt="";
        }
        div class="row" {
            aside class="sidebar" {
                img class="avatar" src=(user.image_url) alt=(user.username);
                h4 id="sidebar-username" { "@" (user.username) }
                @if let Some(bio) = &user.bio { p class="bio" { (bio) } }
                @if let Some(location) = &user.location { p class="location" { (location) } }
                ul class="stats" {
                    li { (stats.messages) " Messages" }
                    li { a href=(format!("/users/{}/following", user.id)) { (stats.following) " Following" } }
                    li { a href=(format!("/users/{}/followers", user.id)) { (stats.followers) " Followers" } }
                    li { a href=(format!("/users/{}/likes", user.id)) { (stats.likes) " Likes" } }
                }
                @if let Some(viewer) = viewer {
                    @if viewer.id == user.id {
                        a class="btn" href="/users/profile" { "Edit Profile" }
                        form method="post" action="/users/delete" {
                            button type="submit" class="btn btn-danger" { "Delete Profile" }
                        }
                    } @else if viewer_follows {
                        form method="post" action=(format!("/users/stop-following/{}", user.id)) {
                            button type="submit" class="btn" { "Unfollow" }
                        }
                    } @else {
                        form method="post" action=(format!("/users/follow/{}", user.id)) {
                            button type="submit" class="btn btn-primary" { "Follow" }
                        }
                    }
                }
            }
            section class="timeline" {
                @for message in messages { (message_card(message, liked)) }
            }
        }
    })
}

pub fn follow_list(
    title: &str,
    owner: &User,
    users: &[User],
    viewer: &User,
    flash: Option<&Flash>,
) -> Markup {
    layout(title, Some(viewer), flash, html! {
        h2 { (title) }
        p class="subtitle" { "@" (owner.username) }
        @if users.is_empty() {
            p class="empty" { "Nothing here yet." }
        }
        div class="user-grid" {
            @for user in users { (user_card(user)) }
        }
    })
}

pub fn likes_page(
    owner: &User,
    messages: &[Message],
    viewer: &User,
    flash: Option<&Flash>,
) -> Markup {
    layout("Likes", Some(viewer), flash, html! {
        h2 { "Likes" }
        p class="subtitle" { "@" (owner.username) }
        @if messages.is_empty() {
            p class="empty" { "No liked warbles yet." }
        }
        section class="timeline" {
            @for message in messages { (message_card(message, None)) }
        }
    })
}

pub fn message_detail(
    message: &Message,
    viewer: Option<&User>,
    viewer_liked: bool,
    flash: Option<&Flash>,
) -> Markup {
    layout("Warble", viewer, flash, html! {
        article class="message-card message-detail" {
            a class="message-author" href=(format!("/users/{}", message.user_id)) {
                "@" (message.author_username)
            }
            span class="timestamp" { (message.timestamp.format("%d %B %Y").to_string()) }
            p class="message-text" { (message.text) }
            @if let Some(viewer) = viewer {
                @if viewer.id == message.user_id {
                    form method="post" action=(format!("/messages/{}/delete", message.id)) {
                        button type="submit" class="btn btn-danger" { "Delete" }
                    }
                } @else {
                    (like_button(message.id, viewer_liked))
                }
            }
        }
    })
}

pub fn new_message_page(
    form: &MessageForm,
    errors: &FieldErrors,
    viewer: &User,
    flash: Option<&Flash>,
) -> Markup {
    layout("New Warble", Some(viewer), flash, html! {
        h2 { "Add my message!" }
        (error_list(errors))
        form class="stacked-form" method="post" action="/messages/new" {
            textarea name="text" rows="3" placeholder="What's happening?" { (form.text) }
            button type="submit" class="btn btn-primary" { "Add my message!" }
        }
    })
}

pub fn edit_profile_page(
    form: &UserEditForm,
    errors: &FieldErrors,
    viewer: &User,
    flash: Option<&Flash>,
) -> Markup {
    layout("Edit Profile", Some(viewer), flash, html! {
        h2 { "Edit Your Profile." }
        (error_list(errors))
        form class="stacked-form" method="post" action="/users/profile" {
            input type="text" name="username" value=(form.username) placeholder="Username";
            input type="text" name="email" value=(form.email) placeholder="E-mail";
            input type="text" name="image_url" value=(form.image_url) placeholder="Image URL";
            input type="text" name="header_image_url" value=(form.header_image_url) placeholder="Header Image URL";
            input type="text" name="bio" value=(form.bio) placeholder="(Optional) Bio";
            input type="text" name="location" value=(form.location) placeholder="Location";
            input type="password" name="password" value="" placeholder="Current password, to confirm changes";
            button type="submit" class="btn btn-primary" { "Edit this user!" }
        }
        a href=(format!("/users/{}", viewer.id)) { "Cancel" }
    })
}

pub fn not_found_page(viewer: Option<&User>) -> Markup {
    layout("Not Found", viewer, None, html! {
        h2 { "404" }
        p { "That page doesn't exist." }
        a href="/" { "Back to the timeline" }
    })
}

pub fn server_error_page() -> Markup {
    layout("Error", None, None, html! {
        h2 { "Something went wrong." }
        p { "Try again in a moment." }
    })
}
