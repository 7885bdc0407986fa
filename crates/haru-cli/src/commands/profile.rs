use anyhow::Result;
use colored::Colorize;
use haru_application::HaruApp;
use haru_core::profile::UserProfile;

fn print_profile(profile: &UserProfile) {
    println!("{} {}", profile.name.bold(), profile.handle.bright_blue());
    println!("{}", profile.bio);
    println!("{}", profile.avatar_url.dimmed());
}

pub fn show(app: &HaruApp) {
    print_profile(&app.profile().get());
}

pub fn set(
    app: &HaruApp,
    name: Option<String>,
    handle: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
) -> Result<()> {
    let current = app.profile().get();
    let updated = app.profile().update(UserProfile {
        name: name.unwrap_or(current.name),
        handle: handle.unwrap_or(current.handle),
        avatar_url: avatar_url.unwrap_or(current.avatar_url),
        bio: bio.unwrap_or(current.bio),
    })?;
    print_profile(&updated);
    Ok(())
}
