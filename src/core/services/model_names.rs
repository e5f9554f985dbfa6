//! 模型展示名与图标分类
//! 全函数：找不到映射时原样返回，不会失败

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

static MODEL_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("gemini-2.5-pro", "Gemini 2.5 Pro"),
        ("gemini-2.5-flash-lite", "Gemini 2.5 Flash Lite"),
        ("claude-sonnet-4-5-thinking", "Claude Sonnet 4.5 Thinking"),
        ("gemini-2.5-flash-image", "Gemini 2.5 Flash Image"),
        ("gemini-2.5-flash-thinking", "Gemini 2.5 Flash Thinking"),
        ("gemini-2.5-flash", "Gemini 2.5 Flash"),
        ("gpt-oss-120b-medium", "GPT OSS 120B Medium"),
        ("gemini-3-pro-image", "Gemini 3 Pro Image"),
        ("gemini-3-pro-high", "Gemini 3 Pro High"),
        ("gemini-3-pro-low", "Gemini 3 Pro Low"),
        ("claude-sonnet-4-5", "Claude Sonnet 4.5"),
        ("chat_20706", "Chat 20706"),
        ("chat_23310", "Chat 23310"),
        ("rev19-uic3-1p", "Rev19 UIC3 1P"),
    ])
});

/// 模型展示名
pub fn display_name(model: &str) -> &str {
    MODEL_NAMES.get(model).copied().unwrap_or(model)
}

/// 模型所属厂商，用于选择图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Gemini,
    Claude,
    OpenAi,
    Other,
}

pub fn model_family(model: &str) -> ModelFamily {
    let lower = model.to_lowercase();
    if lower.contains("gemini") {
        ModelFamily::Gemini
    } else if lower.contains("claude") {
        ModelFamily::Claude
    } else if lower.contains("gpt") {
        ModelFamily::OpenAi
    } else {
        ModelFamily::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_names() {
        assert_eq!(display_name("gemini-3-pro-high"), "Gemini 3 Pro High");
        assert_eq!(display_name("my-custom-model"), "my-custom-model");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_family() {
        assert_eq!(model_family("Gemini-2.5-Pro"), ModelFamily::Gemini);
        assert_eq!(model_family("claude-sonnet-4-5"), ModelFamily::Claude);
        assert_eq!(model_family("gpt-oss-120b-medium"), ModelFamily::OpenAi);
        assert_eq!(model_family("chat_20706"), ModelFamily::Other);
    }
}
