use vitrine_engine::{Tagged, Value};
use vitrine_testing::assertions::{assert_key_absent, assert_keys, assert_len};
use vitrine_testing::fixtures::{Post, blog_registry, sample_post};

#[test]
fn test_post_without_inclusions() {
    let registry = blog_registry();

    let json = registry
        .present_json(Value::object(sample_post()), "", Value::Null)
        .expect("post presents");

    assert_keys(&json, &["id", "title"]).unwrap();
    assert_key_absent(&json, "author").unwrap();
}

#[test]
fn test_post_with_nested_inclusions() {
    let registry = blog_registry();

    let presented = registry
        .present(
            Value::object(sample_post()),
            "author.profile,comments.author",
            Value::Null,
        )
        .expect("post presents");

    insta::assert_json_snapshot!(presented, @r###"
    {
      "id": 10,
      "title": "Notes on the analytical engine",
      "author": {
        "id": 1,
        "name": "Ada",
        "email": "ada@example.com"
      },
      "comments": [
        {
          "id": 100,
          "body": "Nice loops",
          "author": {
            "id": 2,
            "name": "Grace"
          }
        },
        {
          "id": 101,
          "body": "Considered harmful?",
          "author": {
            "id": 3,
            "name": "Edsger"
          }
        }
      ]
    }
    "###);
}

#[test]
fn test_remainders_only_reach_their_branch() {
    let registry = blog_registry();

    let json = registry
        .present_json(
            Value::object(sample_post()),
            vec!["comments", "author.profile"],
            Value::Null,
        )
        .unwrap();

    assert_len(&json, "comments", 2).unwrap();
    for comment in json["comments"].as_array().unwrap() {
        assert_keys(comment, &["id", "body"]).unwrap();
    }
    assert_keys(&json["author"], &["id", "name", "email"]).unwrap();
}

#[test]
fn test_post_resolver_runs_lazily_through_alias() {
    let registry = blog_registry();
    assert_eq!(registry.pending_resolvers(Post::TAG), 1);

    let presenter = registry.resolve("article").unwrap().unwrap();

    assert_eq!(presenter.type_tag().as_str(), Post::TAG);
    assert_eq!(presenter.inclusion_names(), ["author", "comments"]);
    assert_eq!(registry.pending_resolvers("post"), 0);
}

#[test]
fn test_list_of_posts_shares_inclusions() {
    let registry = blog_registry();
    let posts = Value::List(vec![
        Value::object(sample_post()),
        Value::object(sample_post()),
    ]);

    let json = registry.present_json(posts, "author", Value::Null).unwrap();

    let posts = json.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    for post in posts {
        assert_keys(post, &["id", "title", "author"]).unwrap();
        assert_key_absent(&post["author"], "email").unwrap();
    }
}

#[test]
fn test_default_accumulator_is_extended() {
    let registry = blog_registry();
    let envelope = Value::map().with_field("kind", "post");

    let presented = registry
        .present(Value::object(sample_post()), "", envelope)
        .unwrap();

    let keys: Vec<&str> = presented
        .as_map()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["kind", "id", "title"]);
}
