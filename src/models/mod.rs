// src/models/mod.rs

pub mod state;

use crate::utils;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, path::PathBuf};

/// 笔记内容类型。站点用 "normal" 表示图文笔记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoteType {
    #[default]
    Normal,
    Video,
    Unknown,
}

impl From<String> for NoteType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "normal" | "image" => NoteType::Normal,
            "video" => NoteType::Video,
            _ => NoteType::Unknown,
        }
    }
}

impl From<NoteType> for String {
    fn from(value: NoteType) -> Self {
        match value {
            NoteType::Normal => "normal",
            NoteType::Video => "video",
            NoteType::Unknown => "unknown",
        }
        .to_string()
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoteType::Normal => "图文",
            NoteType::Video => "视频",
            NoteType::Unknown => "未知",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    /// 部分接口只返回驼峰写法的 nickName
    #[serde(default, rename = "nickName", deserialize_with = "null_as_default")]
    pub nick_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.nick_name
        } else {
            &self.nickname
        }
    }
}

/// 互动计数保持站点原样的展示字符串（如 "1.2万"），不做数值解析
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked: bool,
    #[serde(default, deserialize_with = "display_count")]
    pub liked_count: String,
    #[serde(default, deserialize_with = "display_count")]
    pub comment_count: String,
    #[serde(default, deserialize_with = "display_count")]
    pub collected_count: String,
    #[serde(default, deserialize_with = "display_count")]
    pub shared_count: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collected: bool,
}

/// 计数字段偶尔以数字形式出现，统一转换为字符串
fn display_count<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(i64),
        Missing(()),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Text(s) => s,
        Count::Number(n) => n.to_string(),
        Count::Missing(()) => String::new(),
    })
}

/// 站点偶尔把字段写成 null，按缺省值处理而不是让整条记录解析失败
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// 笔记中的一张图片
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailImageInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_default: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_pre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub live_photo: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_default: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_pre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub note_type: NoteType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interact_info: InteractInfo,
    #[serde(default)]
    pub cover: Option<Cover>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_list: Vec<DetailImageInfo>,
}

/// 搜索结果中的一条笔记
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: String,
    #[serde(default)]
    pub xsec_token: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note_card: NoteCard,
}

impl PartialEq for Feed {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Feed {}

impl Feed {
    pub fn title(&self) -> &str {
        &self.note_card.display_title
    }

    pub fn note_type(&self) -> NoteType {
        self.note_card.note_type
    }

    pub fn full_url(&self) -> String {
        utils::build_feed_link(&self.id, self.xsec_token.as_deref()).full_url
    }

    /// 可下载的图片列表：优先使用详情图，没有时退回到封面
    pub fn images(&self) -> Vec<DetailImageInfo> {
        if !self.note_card.image_list.is_empty() {
            return self.note_card.image_list.clone();
        }
        self.note_card
            .cover
            .iter()
            .filter(|c| !c.url_default.is_empty())
            .map(|c| DetailImageInfo {
                url_default: c.url_default.clone(),
                url_pre: c.url_pre.clone(),
                width: c.width,
                height: c.height,
                live_photo: false,
            })
            .collect()
    }
}

/// 一张下载成功的图片
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedImageInfo {
    /// 在原图片列表中的序号，从 1 开始
    pub index: usize,
    pub original_url: String,
    pub download_url: String,
    pub local_path: PathBuf,
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub index: usize,
    pub original_url: String,
    pub reason: String,
}

/// 一批图片下载的结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    pub downloaded: Vec<DownloadedImageInfo>,
    pub skipped: Vec<SkippedImage>,
}

impl DownloadReport {
    pub fn total_bytes(&self) -> u64 {
        self.downloaded.iter().map(|d| d.file_size).sum()
    }
}

/// 笔记的可分享链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLink {
    pub feed_id: String,
    pub base_url: String,
    pub full_url: String,
    pub xsec_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_type_parsing() {
        let card: NoteCard = serde_json::from_str(r#"{"type": "video"}"#).unwrap();
        assert_eq!(card.note_type, NoteType::Video);
        let card: NoteCard = serde_json::from_str(r#"{"type": "normal"}"#).unwrap();
        assert_eq!(card.note_type, NoteType::Normal);
        let card: NoteCard = serde_json::from_str(r#"{"type": "live"}"#).unwrap();
        assert_eq!(card.note_type, NoteType::Unknown);
    }

    #[test]
    fn test_counts_accept_numbers_and_strings() {
        let info: InteractInfo = serde_json::from_str(
            r#"{"likedCount": "1.2万", "commentCount": 35, "collectedCount": null}"#,
        )
        .unwrap();
        assert_eq!(info.liked_count, "1.2万");
        assert_eq!(info.comment_count, "35");
        assert_eq!(info.collected_count, "");
        assert_eq!(info.shared_count, "");
    }

    #[test]
    fn test_feed_equality_is_by_id() {
        let a: Feed = serde_json::from_str(r#"{"id": "abc", "xsecToken": "t1"}"#).unwrap();
        let b: Feed = serde_json::from_str(r#"{"id": "abc", "modelType": "note"}"#).unwrap();
        let c: Feed = serde_json::from_str(r#"{"id": "def"}"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_images_fall_back_to_cover() {
        let feed: Feed = serde_json::from_str(
            r#"{"id": "abc", "noteCard": {"cover": {"urlDefault": "http://h/1/2/t!x", "width": 3, "height": 4}}}"#,
        )
        .unwrap();
        let images = feed.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url_default, "http://h/1/2/t!x");
        assert_eq!((images[0].width, images[0].height), (3, 4));

        let bare: Feed = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert!(bare.images().is_empty());
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let user: User = serde_json::from_str(r#"{"nickName": "备用"}"#).unwrap();
        assert_eq!(user.display_name(), "备用");
        let user: User = serde_json::from_str(r#"{"nickname": "主名", "nickName": "备用"}"#).unwrap();
        assert_eq!(user.display_name(), "主名");
    }
}
