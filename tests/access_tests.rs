mod test_utils;

use test_utils::*;
use uuid::Uuid;

use album_delivery::{
    access::{authorize, Actor, AlbumResource, Delivery},
    entities::{selection::SaveSelectionRequest, user::Role},
    errors::{AppError, NOT_PERMITTED},
    use_cases::archive::archive_file_name,
};

struct Cast {
    db: MemoryDb,
    admin: Actor,
    owner: Actor,
    member: Actor,
    stranger: Actor,
}

fn cast() -> Cast {
    let db = MemoryDb::new();
    Cast {
        admin: db.add_user("Admin", Role::Admin),
        owner: db.add_user("Owner", Role::User),
        member: db.add_user("Member", Role::User),
        stranger: db.add_user("Stranger", Role::User),
        db,
    }
}

#[test]
fn anonymous_callers_must_authenticate() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[], 0, true, true);

    for resource in [AlbumResource::Listing, AlbumResource::Archive, AlbumResource::FullResolution] {
        assert!(matches!(authorize(None, &album, resource), Err(AppError::UnauthorizedAccess)));
    }
}

#[test]
fn unpaid_album_serves_previews_to_members() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, false);

    let listing = authorize(Some(&c.member), &album, AlbumResource::Listing).unwrap();
    let archive = authorize(Some(&c.member), &album, AlbumResource::Archive).unwrap();

    assert_eq!(listing.delivery, Delivery::Watermarked);
    assert_eq!(archive.delivery, Delivery::Watermarked);
    assert!(!listing.privileged);
    assert!(matches!(
        authorize(Some(&c.member), &album, AlbumResource::FullResolution),
        Err(AppError::ForbiddenAccess)
    ));
}

#[test]
fn paid_album_serves_originals_to_members() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, true);

    for resource in [AlbumResource::Listing, AlbumResource::Archive, AlbumResource::FullResolution] {
        let grant = authorize(Some(&c.member), &album, resource).unwrap();
        assert_eq!(grant.delivery, Delivery::Original);
        assert!(grant.full_access());
    }
}

#[test]
fn visible_album_lists_previews_to_strangers_only() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, true, true);

    let listing = authorize(Some(&c.stranger), &album, AlbumResource::Listing).unwrap();
    assert_eq!(listing.delivery, Delivery::Watermarked);

    assert!(matches!(
        authorize(Some(&c.stranger), &album, AlbumResource::Archive),
        Err(AppError::ForbiddenAccess)
    ));
    assert!(matches!(
        authorize(Some(&c.stranger), &album, AlbumResource::FullResolution),
        Err(AppError::ForbiddenAccess)
    ));
}

#[test]
fn owner_and_admin_are_privileged() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[], 0, false, false);

    for actor in [&c.owner, &c.admin] {
        let listing = authorize(Some(actor), &album, AlbumResource::Listing).unwrap();
        assert!(listing.privileged);
        assert_eq!(listing.delivery, Delivery::Watermarked);

        let original = authorize(Some(actor), &album, AlbumResource::FullResolution).unwrap();
        assert_eq!(original.delivery, Delivery::Original);
    }
}

#[test]
fn denial_message_does_not_leak_details() {
    assert_eq!(AppError::ForbiddenAccess.to_string(), NOT_PERMITTED);
    assert!(!NOT_PERMITTED.to_lowercase().contains("owner"));
}

#[actix_rt::test]
async fn client_cannot_read_someone_elses_private_album() {
    let c = cast();
    let theirs = c.db.add_album(&c.owner, &[c.member.id], 0, false, true);
    c.db.add_image(&theirs.id, "https://cdn.example.com/private.jpg", true);
    let handler = album_handler(&c.db, MockMedia::new());

    let view = handler.get_album_view(Some(&c.stranger), &theirs.id).await;
    let image = c.db.images_of(&theirs.id)[0].id;
    let original = handler.original_image_url(Some(&c.stranger), &theirs.id, &image).await;
    let archive = archive_handler(&c.db).plan_archive(Some(&c.stranger), &theirs.id).await;

    assert!(matches!(view, Err(AppError::ForbiddenAccess)));
    assert!(matches!(original, Err(AppError::ForbiddenAccess)));
    assert!(matches!(archive, Err(AppError::ForbiddenAccess)));
}

#[actix_rt::test]
async fn album_view_hides_invisible_images_from_clients() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, false);
    let shown = c.db.add_image(&album.id, "https://cdn.example.com/shown.jpg", true);
    c.db.add_image(&album.id, "https://cdn.example.com/hidden.jpg", false);
    let handler = album_handler(&c.db, MockMedia::new());

    let member_view = handler.get_album_view(Some(&c.member), &album.id).await.unwrap();
    let owner_view = handler.get_album_view(Some(&c.owner), &album.id).await.unwrap();

    assert_eq!(member_view.total_images, 1);
    assert_eq!(member_view.images[0].id, shown.id);
    assert_eq!(member_view.images[0].url, shown.watermarked_url);
    assert!(!member_view.full_access);
    assert_eq!(owner_view.total_images, 2);
}

#[actix_rt::test]
async fn paid_member_is_redirected_to_original() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, true);
    let image = c.db.add_image(&album.id, "https://cdn.example.com/full.jpg", true);
    let hidden = c.db.add_image(&album.id, "https://cdn.example.com/secret.jpg", false);
    let handler = album_handler(&c.db, MockMedia::new());

    let url = handler.original_image_url(Some(&c.member), &album.id, &image.id).await.unwrap();
    let hidden_result = handler.original_image_url(Some(&c.member), &album.id, &hidden.id).await;

    assert_eq!(url, image.url);
    assert!(matches!(hidden_result, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn archive_plan_uses_delivery_urls_in_album_order() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, false);
    let first = c.db.add_image(&album.id, "https://cdn.example.com/one.png", true);
    c.db.add_image(&album.id, "https://cdn.example.com/two.jpg", false);
    let third = c.db.add_image(&album.id, "https://cdn.example.com/three.jpeg", true);

    let plan = archive_handler(&c.db).plan_archive(Some(&c.member), &album.id).await.unwrap();

    assert_eq!(plan.file_name, "wedding-day.zip");
    assert_eq!(plan.entries.len(), 2);
    assert_eq!(plan.entries[0].url, first.watermarked_url);
    assert_eq!(plan.entries[0].name, format!("001_{}.png", first.id));
    assert_eq!(plan.entries[1].url, third.watermarked_url);
}

#[actix_rt::test]
async fn archive_of_empty_album_is_not_found() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, true);

    let result = archive_handler(&c.db).plan_archive(Some(&c.member), &album.id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn archive_names_fall_back_for_unsluggable_titles() {
    assert_eq!(archive_file_name("Ada & Tunde's Wedding"), "ada-tunde-s-wedding.zip");
    assert_eq!(archive_file_name("!!!"), "album.zip");
}

#[actix_rt::test]
async fn selections_only_accept_visible_album_images() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, false);
    let a = c.db.add_image(&album.id, "https://cdn.example.com/a.jpg", true);
    let b = c.db.add_image(&album.id, "https://cdn.example.com/b.jpg", true);
    let hidden = c.db.add_image(&album.id, "https://cdn.example.com/h.jpg", false);
    let handler = selection_handler(&c.db);

    let saved = handler
        .save_selection(&c.member, &album.id, SaveSelectionRequest { image_ids: vec![a.id, b.id, a.id] })
        .await
        .unwrap();
    let rejected = handler
        .save_selection(&c.member, &album.id, SaveSelectionRequest { image_ids: vec![hidden.id] })
        .await;
    let foreign = handler
        .save_selection(&c.member, &album.id, SaveSelectionRequest { image_ids: vec![Uuid::new_v4()] })
        .await;

    assert_eq!(saved.image_ids, vec![a.id, b.id]);
    assert!(matches!(rejected, Err(AppError::InvalidInput(_))));
    assert!(matches!(foreign, Err(AppError::InvalidInput(_))));

    let stored = handler.get_selection(&c.member, &album.id).await.unwrap();
    assert_eq!(stored.image_ids, vec![a.id, b.id]);

    let listed = handler.list_for_album(&album.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user_id, c.member.id);
}

#[actix_rt::test]
async fn selections_are_closed_to_outsiders() {
    let c = cast();
    let album = c.db.add_album(&c.owner, &[c.member.id], 0, false, false);
    let handler = selection_handler(&c.db);

    let result = handler
        .save_selection(&c.stranger, &album.id, SaveSelectionRequest { image_ids: vec![] })
        .await;
    let missing = handler.get_selection(&c.member, &album.id).await;

    assert!(matches!(result, Err(AppError::ForbiddenAccess)));
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
