//! Postgres store behavior.
//!
//! These mirror the in-memory store's unit tests so the two backends are held
//! to the same semantics.

use clients::easel::field;
use color_eyre::Result;
use easel::db::{Collection, DocumentId, Filter, Find, Postgres, Sort, Update};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::document;

#[sqlx::test(migrations = false)]
async fn validate_migrations_fails_without_migrations(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };

    let err = db.validate_migrations().await.unwrap_err().to_string();
    assert!(
        err.contains("Run 'easel migrate' first"),
        "error should give actionable guidance: {err}"
    );
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn validate_migrations_succeeds_with_migrations(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    db.validate_migrations().await?;
    db.ping().await?;
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn insert_and_find_by_id(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };

    let submitted = document(json!({ "title": "Harbor", "tags": ["oil"], "size": 4 }));
    let id = db.insert(Collection::Artworks, submitted.clone()).await?;

    let stored = db
        .find_one(Collection::Artworks, &Filter::Id(id))
        .await?
        .expect("document exists");
    pretty_assert_eq!(stored.id, id);
    pretty_assert_eq!(stored.fields, submitted);

    let missing = db
        .find_one(Collection::Artworks, &Filter::Id(DocumentId::generate()))
        .await?;
    assert!(missing.is_none());
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn find_filters_sorts_and_limits(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    for (title, email, posted_at) in [
        ("a", "ana@example.com", Some("2024-01-01")),
        ("b", "ben@example.com", Some("2024-03-01")),
        ("c", "ana@example.com", None),
        ("d", "ana@example.com", Some("2024-02-01")),
    ] {
        let mut doc = document(json!({ "title": title, "email": email }));
        if let Some(posted_at) = posted_at {
            doc.insert(field::POSTED_AT.to_string(), json!(posted_at));
        }
        db.insert(Collection::Artworks, doc).await?;
    }

    let titles = |docs: Vec<easel::db::StoredDocument>| {
        docs.into_iter()
            .map(|doc| doc.fields["title"].clone())
            .collect::<Vec<Value>>()
    };

    let all = db.find(Collection::Artworks, &Find::all()).await?;
    pretty_assert_eq!(titles(all), vec![json!("a"), json!("b"), json!("c"), json!("d")]);

    let ana = Find::matching(Filter::field(field::EMAIL, "ana@example.com"));
    let owned = db.find(Collection::Artworks, &ana).await?;
    pretty_assert_eq!(titles(owned), vec![json!("a"), json!("c"), json!("d")]);

    let newest = Find::builder()
        .sort(Sort::descending(field::POSTED_AT))
        .limit(3)
        .build();
    let sorted = db.find(Collection::Artworks, &newest).await?;
    pretty_assert_eq!(titles(sorted), vec![json!("b"), json!("d"), json!("a")]);

    let everything = Find::builder()
        .sort(Sort::descending(field::POSTED_AT))
        .build();
    let sorted = db.find(Collection::Artworks, &everything).await?;
    pretty_assert_eq!(
        titles(sorted),
        vec![json!("b"), json!("d"), json!("a"), json!("c")]
    );
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn field_filter_is_exact_string_match(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    db.insert(Collection::Favorites, document(json!({ "artId": "7" })))
        .await?;
    db.insert(Collection::Favorites, document(json!({ "artId": 7 })))
        .await?;

    let found = db
        .find(
            Collection::Favorites,
            &Find::matching(Filter::field(field::ART_ID, "7")),
        )
        .await?;
    pretty_assert_eq!(found.len(), 1);
    pretty_assert_eq!(found[0].fields[field::ART_ID], json!("7"));
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn update_one_applies_updates(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    let id = db
        .insert(Collection::Artworks, document(json!({ "title": "Harbor" })))
        .await?;

    let updates = [
        Update::AddToSet {
            field: field::LIKED_BY,
            value: json!("ana@example.com"),
        },
        Update::Inc {
            field: field::LIKE_COUNT,
            by: 1,
        },
    ];
    assert!(db.update_one(Collection::Artworks, id, &updates).await?);
    assert!(
        !db.update_one(Collection::Artworks, DocumentId::generate(), &updates)
            .await?
    );

    let stored = db
        .find_one(Collection::Artworks, &Filter::Id(id))
        .await?
        .expect("document exists");
    pretty_assert_eq!(
        Value::Object(stored.fields),
        json!({ "title": "Harbor", "likedBy": ["ana@example.com"], "likeCount": 1 })
    );
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn update_one_rejects_type_mismatch(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    let id = db
        .insert(Collection::Artworks, document(json!({ "likeCount": "many" })))
        .await?;

    let updates = [Update::Inc {
        field: field::LIKE_COUNT,
        by: 1,
    }];
    assert!(db.update_one(Collection::Artworks, id, &updates).await.is_err());

    let stored = db
        .find_one(Collection::Artworks, &Filter::Id(id))
        .await?
        .expect("document exists");
    pretty_assert_eq!(stored.fields[field::LIKE_COUNT], json!("many"));
    Ok(())
}

#[sqlx::test(migrator = "easel::db::Postgres::MIGRATOR")]
async fn delete_one_removes_first_match(pool: PgPool) -> Result<()> {
    let db = Postgres { pool };
    for owner in ["ana@example.com", "ben@example.com"] {
        db.insert(
            Collection::Favorites,
            document(json!({ "email": owner, "artId": "a1" })),
        )
        .await?;
    }

    let filter = Filter::field(field::ART_ID, "a1");
    assert!(db.delete_one(Collection::Favorites, &filter).await?);

    let remaining = db.find(Collection::Favorites, &Find::all()).await?;
    pretty_assert_eq!(remaining.len(), 1);
    pretty_assert_eq!(remaining[0].fields[field::EMAIL], json!("ben@example.com"));

    assert!(db.delete_one(Collection::Favorites, &filter).await?);
    assert!(!db.delete_one(Collection::Favorites, &filter).await?);
    Ok(())
}
