//! Demo content for a fresh in-memory backend.

use chrono::{DateTime, Utc};

use pulse_core::SourceError;
use pulse_core::domain::{Comment, Post, User};
use pulse_infra::source::comments_collection;
use pulse_infra::{Collection, CollectionProvider};

pub const DEMO_POST_COUNT: usize = 5;

fn demo_users() -> [User; 3] {
    [
        User::new("1")
            .with_display_name("Gerry Ariella")
            .with_email("gariella@mail.fr"),
        User::new("2")
            .with_display_name("Brenton Capri")
            .with_email("bcapri@mail.fr"),
        User::new("3")
            .with_display_name("Wally Claud")
            .with_email("wclaud@mail.fr"),
    ]
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn post(
    id: &str,
    title: &str,
    description: Option<&str>,
    photo_url: Option<&str>,
    secs: i64,
    author: &User,
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        photo_url: photo_url.map(str::to_string),
        created_at: at(secs),
        author: Some(author.clone()),
    }
}

fn demo_posts() -> Vec<Post> {
    let [gerry, brenton, wally] = demo_users();
    vec![
        post(
            "5",
            "The Secret of the Flowers",
            Some("Improve your goldfish's physical fitness by getting him a bicycle."),
            None,
            1_629_858_873,
            &gerry,
        ),
        post(
            "4",
            "The Door's Game",
            None,
            Some("https://picsum.photos/id/85/1080/"),
            1_451_638_679,
            &wally,
        ),
        post(
            "1",
            "Laughing History",
            Some("He learned the important lesson that a picnic at the beach on a windy day is a bad idea."),
            None,
            1_361_696_994,
            &gerry,
        ),
        post(
            "3",
            "Woman of Years",
            Some("After fighting off the alligator, Brian still had to face the anaconda."),
            None,
            1_346_601_558,
            &gerry,
        ),
        post(
            "2",
            "The Invisible Window",
            None,
            Some("https://picsum.photos/id/40/1080/"),
            1_210_645_031,
            &brenton,
        ),
    ]
}

fn demo_comments() -> Vec<Comment> {
    let [gerry, brenton, wally] = demo_users();
    [
        ("1", "5", "I'm lovin' it!", 1_760_880_237, gerry),
        ("2", "5", "Nothing is impossible, thanks!", 1_760_200_000, brenton),
        ("3", "4", "Get up, stand up, go for it", 1_760_100_000, wally),
    ]
    .into_iter()
    .map(|(id, post_id, content, secs, author)| Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        content: content.to_string(),
        created_at: at(secs),
        author: Some(author),
    })
    .collect()
}

/// Write the demo posts and comments straight into the collections.
pub async fn seed_demo_content(
    posts: &dyn Collection<Post>,
    comments: &dyn CollectionProvider<Comment>,
) -> Result<(), SourceError> {
    for post in demo_posts() {
        posts.upsert(post).await?;
    }
    for comment in demo_comments() {
        comments
            .collection(&comments_collection(&comment.post_id))
            .upsert(comment)
            .await?;
    }

    tracing::info!(posts = DEMO_POST_COUNT, "Demo content seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_posts_are_valid() {
        let posts = demo_posts();
        assert_eq!(posts.len(), DEMO_POST_COUNT);
        assert!(posts.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_demo_comments_are_valid() {
        assert!(demo_comments().iter().all(|c| c.validate().is_ok()));
    }
}
