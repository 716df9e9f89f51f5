//! Unit tests for the image codec

use floorplan_render::codec::{read_path, CodecError, EncodedImage, MimeType, RawFile};

#[test]
fn test_encode_then_inspect() {
    let file = RawFile::new("plan.webp", Some("image/webp".to_string()), b"RIFF0000WEBPdata".to_vec());
    let encoded = file.encode();

    assert!(encoded.as_str().starts_with("data:image/webp;base64,"));
    assert_eq!(MimeType::parse(encoded.mime_type()), Some(MimeType::Webp));
    assert_eq!(encoded.decode().unwrap(), b"RIFF0000WEBPdata");
}

#[test]
fn test_parse_existing_data_url() {
    let encoded = EncodedImage::parse("data:image/jpeg;base64,SGVsbG8=").unwrap();
    assert_eq!(encoded.mime_type(), "image/jpeg");
    assert_eq!(encoded.payload(), "SGVsbG8=");
}

#[test]
fn test_read_path_infers_type_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ground-floor.PNG");
    std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).unwrap();

    let file = tokio_test::block_on(read_path(&path)).unwrap();

    assert_eq!(file.name, "ground-floor.PNG");
    assert_eq!(file.declared_type.as_deref(), Some("image/png"));
    assert_eq!(file.bytes, vec![0x89, 0x50, 0x4E, 0x47]);
}

#[tokio::test]
async fn test_read_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_path(dir.path().join("missing.png")).await.unwrap_err();

    match err {
        CodecError::Read { name, .. } => assert_eq!(name, "missing.png"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_serde_uses_data_url_string() {
    let encoded = EncodedImage::from_bytes(b"abc", "image/bmp");
    let json = serde_json::to_string(&encoded).unwrap();
    assert_eq!(json, "\"data:image/bmp;base64,YWJj\"");

    let back: EncodedImage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, encoded);
    assert!(serde_json::from_str::<EncodedImage>("\"plain text\"").is_err());
}
