use storefront_api::storage::{BlobStore, LocalBlobStore, UploadFolder, sanitize_file_name};
use uuid::Uuid;

#[test]
fn file_names_are_sanitized() {
    assert_eq!(sanitize_file_name("photo 1.png"), "photo_1.png");
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name(r"C:\Users\me\pic.jpg"), "pic.jpg");
    assert_eq!(sanitize_file_name(".hidden"), "hidden");
    assert_eq!(sanitize_file_name(""), "upload");
}

#[test]
fn upload_folders_parse_known_paths_only() {
    assert_eq!(
        UploadFolder::parse("products/main_images"),
        Some(UploadFolder::ProductMainImage)
    );
    assert_eq!(UploadFolder::parse("/users/image/"), Some(UploadFolder::UserImage));
    assert_eq!(UploadFolder::parse("../secrets"), None);
    assert_eq!(UploadFolder::CountryIcon.as_path(), "country/icons");
}

#[tokio::test]
async fn local_store_writes_under_folder_and_returns_url() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("storefront-blobs-{}", Uuid::new_v4()));
    let store = LocalBlobStore::new(&root, "/media/");

    let url = store
        .put(UploadFolder::ProductImage, "front view.jpg", b"jpeg-bytes")
        .await?;
    assert!(url.starts_with("/media/products/images/"), "{url}");
    assert!(url.ends_with("-front_view.jpg"), "{url}");

    let stored_name = url.rsplit('/').next().expect("file name");
    let written = tokio::fs::read(root.join("products/images").join(stored_name)).await?;
    assert_eq!(written, b"jpeg-bytes");

    tokio::fs::remove_dir_all(&root).await?;
    Ok(())
}
