use super::ocr::parse_ocr_response;
use super::*;
use crate::oracle::MockOracleClient;

fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.resize(len, 0u8);
    bytes
}

#[test]
fn test_validate_rejects_empty_and_small_inputs() {
    assert!(matches!(validate_screenshot(&[]), Err(ExtractionError::Empty)));
    assert!(matches!(
        validate_screenshot(&png_bytes(999)),
        Err(ExtractionError::TooSmall { size: 999 })
    ));
}

#[test]
fn test_validate_rejects_unknown_magic() {
    let bytes = vec![0u8; 2000];
    assert!(matches!(
        validate_screenshot(&bytes),
        Err(ExtractionError::UnrecognizedFormat)
    ));
}

#[test]
fn test_validate_accepts_known_headers() {
    for header in [
        b"\xff\xd8\xff".as_slice(),
        b"\x89PNG\r\n\x1a\n".as_slice(),
        b"RIFF".as_slice(),
        b"GIF87a".as_slice(),
        b"GIF89a".as_slice(),
    ] {
        let mut bytes = header.to_vec();
        bytes.resize(2000, 0u8);
        assert!(validate_screenshot(&bytes).is_ok());
    }
}

#[test]
fn test_parse_ocr_response_plain_string() {
    let raw = r#"{
        "extracted_text": "Breaking: orange vests mandatory",
        "image_regions": [
            {"description": "hunter in field", "position": "top", "type": "photo", "size": "large", "context": "header image"}
        ],
        "layout_analysis": {
            "source_type": "news_website",
            "platform": "news_site",
            "layout_type": "desktop"
        }
    }"#;

    let content = parse_ocr_response(raw).expect("should parse");
    assert_eq!(content.text, "Breaking: orange vests mandatory");
    assert_eq!(content.image_regions.len(), 1);
    assert_eq!(content.image_regions[0].kind, "photo");
    assert_eq!(content.layout.source_type, "news_website");
    assert_eq!(content.layout.platform, "news_site");
}

#[test]
fn test_parse_ocr_response_flattens_nested_text() {
    // Sections must flatten in fixed order: metadata, body, caption, branding, other_text.
    let raw = r#"{
        "extracted_text": {
            "branding": "CONNECTICUT SENTINEL",
            "body": ["I wear orange", "to protect myself"],
            "metadata": {"author": "Angela Eichhorst", "date": "September 17, 2025"},
            "caption": "hunters in the field"
        },
        "image_regions": [],
        "layout_analysis": {"source_type": "news_website", "platform": "unknown", "layout_type": "mobile"}
    }"#;

    let content = parse_ocr_response(raw).expect("should parse");
    assert_eq!(
        content.text,
        "Angela Eichhorst September 17, 2025 I wear orange to protect myself hunters in the field CONNECTICUT SENTINEL"
    );
}

#[test]
fn test_parse_ocr_response_rejects_non_json() {
    let result = parse_ocr_response("Sure! Here is the text I found: ...");
    assert!(matches!(
        result,
        Err(ExtractionError::MalformedResponse { .. })
    ));
}

#[test]
fn test_parse_ocr_response_rejects_missing_text_field() {
    let result = parse_ocr_response(r#"{"image_regions": []}"#);
    assert!(matches!(
        result,
        Err(ExtractionError::MalformedResponse { .. })
    ));
}

#[test]
fn test_region_proxying_caps_at_three_full_frames() {
    let screenshot = png_bytes(2048);
    let regions = vec![ImageRegion::default(); 5];

    let proxies = proxy_regions(&screenshot, &regions);

    assert_eq!(proxies.len(), MAX_REGION_PROXIES);
    // Every region resolves to the entire original frame.
    assert!(proxies.iter().all(|p| *p == screenshot));
}

#[tokio::test]
async fn test_extract_from_screenshot_validates_before_calling_oracle() {
    let oracle = MockOracleClient::new();

    let result = extract_from_screenshot(&oracle, &[0u8; 10]).await;

    assert!(matches!(result, Err(ExtractionError::TooSmall { .. })));
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_extract_from_screenshot_happy_path() {
    let oracle = MockOracleClient::with_default_response(
        r#"{"extracted_text": "headline text", "image_regions": [], "layout_analysis": {"source_type": "social_media", "platform": "twitter", "layout_type": "mobile"}}"#,
    );

    let content = extract_from_screenshot(&oracle, &png_bytes(2048))
        .await
        .expect("should extract");

    assert_eq!(content.text, "headline text");
    assert_eq!(content.layout.platform, "twitter");
    assert_eq!(oracle.call_count(), 1);
}
