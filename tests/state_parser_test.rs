// tests/state_parser_test.rs

use xhs_dl::{
    error::AppError,
    extractor::decode_feeds,
    models::NoteType,
};

const FIXTURE: &str = include_str!("fixtures/search_state.json");

#[test]
fn test_decode_fixture_keeps_order_and_fields() {
    let feeds = decode_feeds(FIXTURE).expect("fixture should parse");
    assert_eq!(feeds.len(), 3);

    let first = &feeds[0];
    assert_eq!(first.id, "64b8f0c2000000001e03a1b2");
    assert_eq!(first.xsec_token.as_deref(), Some("ABc1dEfG2hIj3KlM="));
    assert_eq!(first.note_type(), NoteType::Normal);
    assert_eq!(first.note_card.user.display_name(), "背包客小林");
    assert_eq!(first.note_card.interact_info.liked_count, "1.2万");
    // 数字形式的计数也保留为字符串
    assert_eq!(first.note_card.interact_info.comment_count, "356");
    assert_eq!(first.images().len(), 2);
    assert!(first.images()[1].live_photo);
    assert_eq!(
        first.full_url(),
        "https://www.xiaohongshu.com/explore/64b8f0c2000000001e03a1b2?xsec_token=ABc1dEfG2hIj3KlM="
    );
}

#[test]
fn test_video_feed_falls_back_to_cover_image() {
    let feeds = decode_feeds(FIXTURE).unwrap();
    let video = &feeds[1];

    assert_eq!(video.note_type(), NoteType::Video);
    assert_eq!(video.note_card.user.display_name(), "阿杰在路上");
    let images = video.images();
    assert_eq!(images.len(), 1);
    assert!(images[0].url_default.ends_with("1040g00video!nc_n_webp_mw_1"));
    assert_eq!((images[0].width, images[0].height), (720, 960));
}

#[test]
fn test_entry_without_note_card_uses_defaults() {
    let feeds = decode_feeds(FIXTURE).unwrap();
    let entry = &feeds[2];

    assert_eq!(entry.model_type, "hot_query");
    assert!(entry.xsec_token.is_none());
    assert!(entry.title().is_empty());
    assert!(entry.images().is_empty());
    assert_eq!(entry.full_url(), "https://www.xiaohongshu.com/explore/hot_query_3");
}

#[test]
fn test_empty_feed_list_is_not_an_error() {
    let feeds = decode_feeds(r#"{"search": {"feeds": {"_value": []}}}"#).unwrap();
    assert!(feeds.is_empty());
}

#[test]
fn test_unknown_note_type_is_kept() {
    let text = r#"{"search": {"feeds": {"_value": [
        {"id": "a1", "noteCard": {"type": "live", "displayTitle": "直播"}}
    ]}}}"#;
    let feeds = decode_feeds(text).unwrap();
    assert_eq!(feeds[0].note_type(), NoteType::Unknown);
}

#[test]
fn test_malformed_state_is_a_decode_error() {
    for text in [
        "{not json",
        r#"{"search": {}}"#,
        r#"{"search": {"feeds": {"_value": [{"noteCard": {}}]}}}"#,
    ] {
        let err = decode_feeds(text).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)), "{text}: got {err:?}");
    }
}

#[test]
fn test_null_fields_decode_as_empty_values() {
    let text = r#"{"search": {"feeds": {"_value": [
        {"id": "n1", "modelType": null, "noteCard": {
            "type": null,
            "displayTitle": null,
            "user": {"nickname": null, "nickName": "备用"},
            "interactInfo": {"liked": null, "likedCount": null},
            "cover": null,
            "imageList": [{"urlDefault": "http://h/1/2/t!x", "width": null, "height": 640, "livePhoto": null}]
        }},
        {"id": "n2", "xsecToken": null, "noteCard": null},
        {"id": "n3", "noteCard": {"imageList": null, "user": null}}
    ]}}}"#;

    let feeds = decode_feeds(text).expect("null fields must not fail the whole list");
    let ids: Vec<&str> = feeds.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["n1", "n2", "n3"]);

    let first = &feeds[0];
    assert_eq!(first.model_type, "");
    assert_eq!(first.note_type(), NoteType::Normal);
    assert_eq!(first.title(), "");
    assert_eq!(first.note_card.user.display_name(), "备用");
    assert!(!first.note_card.interact_info.liked);
    assert_eq!(first.note_card.interact_info.liked_count, "");
    let images = first.images();
    assert_eq!((images[0].width, images[0].height), (0, 640));
    assert!(!images[0].live_photo);

    assert!(feeds[1].xsec_token.is_none());
    assert!(feeds[1].title().is_empty());
    assert!(feeds[1].images().is_empty());
    assert!(feeds[2].images().is_empty());
}
