//! End-to-end API behavior through the typed client.

use clients::easel::{EmailFilter, field};
use color_eyre::Result;
use easel::db::{Collection, Find};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::json;

use crate::{TestFixture, document};

#[test_log::test(tokio::test)]
async fn health() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    fixture.client.ping().await?;
    Ok(())
}

#[test_log::test(tokio::test)]
async fn artwork_lifecycle() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    let client = &fixture.client;

    let submitted = document(json!({
        "title": "Harbor at dusk",
        "email": "ana@example.com",
        "postedAt": "2024-05-01T10:00:00Z",
    }));
    let ack = client.create_artwork(&submitted).await?;
    assert!(ack.acknowledged);

    let mut artwork = client
        .artwork(&ack.inserted_id)
        .await?
        .expect("artwork exists");
    pretty_assert_eq!(artwork.remove(field::ID), Some(json!(ack.inserted_id)));
    pretty_assert_eq!(artwork, submitted);

    pretty_assert_eq!(client.artworks().await?.len(), 1);
    pretty_assert_eq!(client.gallery("ana@example.com").await?.len(), 1);
    pretty_assert_eq!(client.gallery("ben@example.com").await?.len(), 0);

    let message = client.toggle_like(&ack.inserted_id, "ben@example.com").await?;
    pretty_assert_eq!(message, "Liked the art");
    let message = client.toggle_like(&ack.inserted_id, "ben@example.com").await?;
    pretty_assert_eq!(message, "Unliked the art");

    let artwork = client
        .artwork(&ack.inserted_id)
        .await?
        .expect("artwork exists");
    pretty_assert_eq!(artwork[field::LIKED_BY], json!([]));
    pretty_assert_eq!(artwork[field::LIKE_COUNT], json!(2));

    Ok(())
}

#[test_log::test(tokio::test)]
async fn missing_artwork() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;

    let artwork = fixture
        .client
        .artwork("00000000-0000-4000-8000-000000000000")
        .await?;
    assert!(artwork.is_none());

    let malformed = fixture.client.artwork("not-an-id").await;
    assert!(malformed.is_err());

    Ok(())
}

#[test_log::test(tokio::test)]
async fn homepage_is_capped_and_sorted() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    for month in 1..=9 {
        fixture
            .client
            .create_artwork(&document(json!({ "postedAt": format!("2024-0{month}-01") })))
            .await?;
    }

    let homepage = fixture.client.homepage_artworks().await?;
    let posted = homepage
        .iter()
        .map(|art| art[field::POSTED_AT].clone())
        .collect::<Vec<_>>();
    pretty_assert_eq!(
        posted,
        vec![
            json!("2024-09-01"),
            json!("2024-08-01"),
            json!("2024-07-01"),
            json!("2024-06-01"),
            json!("2024-05-01"),
            json!("2024-04-01"),
        ]
    );

    Ok(())
}

#[test_log::test(tokio::test)]
async fn gallery_entries() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    let client = &fixture.client;

    client
        .add_gallery_entry(&document(json!({ "id": "g1", "userEmail": "ana@example.com" })))
        .await?;
    client
        .add_gallery_entry(&document(json!({ "id": "g2", "userEmail": "ben@example.com" })))
        .await?;

    let ana = EmailFilter::builder().email("ana@example.com").build();
    let entries = client.gallery_entries(&ana).await?;
    pretty_assert_eq!(entries.len(), 1);
    pretty_assert_eq!(entries[0]["id"], json!("g1"));
    pretty_assert_eq!(client.gallery_entries(&EmailFilter::default()).await?.len(), 2);

    let deleted = client.delete_gallery_entry("g1").await?;
    assert!(deleted.success);
    let missing = client.delete_gallery_entry("g1").await?;
    assert!(!missing.success);

    pretty_assert_eq!(client.gallery_entries(&ana).await?.len(), 0);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn favorites() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    let client = &fixture.client;

    let favorite = document(json!({ "email": "ana@example.com", "artId": "a1" }));
    let first = client.add_favorite(&favorite).await?;
    let second = client.add_favorite(&favorite).await?;
    assert!(first.inserted_id != second.inserted_id);

    let ana = EmailFilter::builder().email("ana@example.com").build();
    pretty_assert_eq!(client.favorites(&ana).await?.len(), 2);

    assert!(client.delete_favorite("a1").await?.success);
    assert!(client.delete_favorite("a1").await?.success);
    let missing = client.delete_favorite("a1").await?;
    assert!(!missing.success);

    pretty_assert_eq!(client.favorites(&ana).await?.len(), 0);
    let stored = fixture
        .store
        .find(Collection::Favorites, &Find::all())
        .await?;
    assert!(stored.is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn path_values_with_reserved_characters() -> Result<()> {
    let fixture = TestFixture::spawn_memory().await?;
    let client = &fixture.client;

    client
        .create_artwork(&document(json!({ "title": "Mine", "email": "ana#1@example.com" })))
        .await?;
    client
        .create_artwork(&document(json!({ "title": "Not mine", "email": "ana" })))
        .await?;
    let gallery = client.gallery("ana#1@example.com").await?;
    pretty_assert_eq!(gallery.len(), 1);
    pretty_assert_eq!(gallery[0]["title"], json!("Mine"));

    client
        .add_gallery_entry(&document(json!({ "id": "g:1", "userEmail": "ana@example.com" })))
        .await?;
    let deleted = client.delete_gallery_entry("g:1").await?;
    assert!(deleted.success);

    client
        .add_favorite(&document(json!({ "email": "ana@example.com", "artId": "a?1" })))
        .await?;
    let removed = client.delete_favorite("a?1").await?;
    assert!(removed.success);

    let entries = fixture.store.find(Collection::Gallery, &Find::all()).await?;
    assert!(entries.is_empty());
    Ok(())
}
