//! Fixtures for a small blog domain.
//!
//! Provides:
//! - `Post`, `Author` and `Comment` domain types with stable tags
//! - `register_blog()`: presenters for all three, with `author`,
//!   `comments` and `profile` inclusions
//! - `sample_post()`: one post with two comments by different authors

use anyhow::Context;
use std::sync::Arc;
use vitrine_engine::Registry;
use vitrine_types::{Tagged, Value};

/// Aliases registered for `Post` alongside its resolver.
pub const POST_ALIASES: [&str; 2] = ["post", "article"];

#[derive(Debug, Clone)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl Tagged for Author {
    const TAG: &'static str = "blog.author";
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub author: Arc<Author>,
}

impl Tagged for Comment {
    const TAG: &'static str = "blog.comment";
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub author: Arc<Author>,
    pub comments: Vec<Comment>,
}

impl Tagged for Post {
    const TAG: &'static str = "blog.post";
}

/// Registry with every blog presenter registered.
pub fn blog_registry() -> Registry {
    let registry = Registry::new();
    register_blog(&registry);
    registry
}

/// Register blog presenters on an existing registry.
///
/// Authors and comments are registered eagerly; posts go through a resolver
/// (with [`POST_ALIASES`]) so tests can observe lazy setup.
pub fn register_blog(registry: &Registry) {
    registry
        .presenter_for::<Author>()
        .using(|subject, acc, _, _| {
            let author = expect::<Author>(subject)?;
            Ok(acc
                .with_field("id", author.id)
                .with_field("name", author.name.as_str()))
        })
        .with("profile", |subject, acc, _, _| {
            let author = expect::<Author>(subject)?;
            Ok(acc.with_field("email", author.email.as_str()))
        });

    registry
        .presenter_for::<Comment>()
        .using(|subject, acc, _, _| {
            let comment = expect::<Comment>(subject)?;
            Ok(acc
                .with_field("id", comment.id)
                .with_field("body", comment.body.as_str()))
        })
        .with("author", |subject, acc, with, registry| {
            let comment = expect::<Comment>(subject)?;
            let author = registry.present(Value::Object(comment.author.clone()), with, Value::Null)?;
            Ok(acc.with_field("author", author))
        });

    registry.add_resolver_with_aliases(
        Post::TAG,
        |presenter, _| {
            presenter
                .using(|subject, acc, _, _| {
                    let post = expect::<Post>(subject)?;
                    Ok(acc
                        .with_field("id", post.id)
                        .with_field("title", post.title.as_str()))
                })
                .with("author", |subject, acc, with, registry| {
                    let post = expect::<Post>(subject)?;
                    let author =
                        registry.present(Value::Object(post.author.clone()), with, Value::Null)?;
                    Ok(acc.with_field("author", author))
                })
                .with("comments", |subject, acc, with, registry| {
                    let post = expect::<Post>(subject)?;
                    let comments = post.comments.iter().cloned().map(Value::object).collect();
                    let comments = registry.present(Value::List(comments), with, Value::Null)?;
                    Ok(acc.with_field("comments", comments))
                });
            Ok(())
        },
        POST_ALIASES,
    );
}

/// A post by Ada with comments from Grace and Edsger.
pub fn sample_post() -> Post {
    let ada = Arc::new(Author {
        id: 1,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    });
    let grace = Arc::new(Author {
        id: 2,
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
    });
    let edsger = Arc::new(Author {
        id: 3,
        name: "Edsger".to_string(),
        email: "edsger@example.com".to_string(),
    });

    Post {
        id: 10,
        title: "Notes on the analytical engine".to_string(),
        author: ada,
        comments: vec![
            Comment {
                id: 100,
                body: "Nice loops".to_string(),
                author: grace,
            },
            Comment {
                id: 101,
                body: "Considered harmful?".to_string(),
                author: edsger,
            },
        ],
    }
}

fn expect<T: Tagged + 'static>(subject: &Value) -> anyhow::Result<&T> {
    subject
        .downcast_ref::<T>()
        .with_context(|| format!("expected a {} subject", T::TAG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_registry_wires_presenters() {
        let registry = blog_registry();

        assert!(registry.has_presenter(Author::TAG));
        assert!(registry.has_presenter(Comment::TAG));
        assert!(!registry.has_presenter(Post::TAG));
        assert_eq!(registry.pending_resolvers("article"), 1);
    }

    #[test]
    fn test_sample_post_shape() {
        let post = sample_post();
        assert_eq!(post.comments.len(), 2);
        assert_ne!(post.comments[0].author.id, post.comments[1].author.id);
    }
}
