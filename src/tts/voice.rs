//! Voice catalog, metadata and description matching.
//!
//! Two const catalogs are provided:
//! - [`CLOUD_VOICES`] — DashScope CosyVoice timbres (cloud synthesis).
//! - [`LOCAL_VOICES`] — Piper neural voices (offline synthesis).
//!
//! [`match_voice`] maps a free-form description (e.g. "温柔的女声",
//! "像新闻主播") onto a catalog entry via substring and keyword scoring.

// ---------------------------------------------------------------------------
// EngineKind / Gender
// ---------------------------------------------------------------------------

/// Which synthesis backend a voice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// DashScope CosyVoice cloud API.
    CosyVoice,
    /// Local Piper neural engine.
    Piper,
}

impl EngineKind {
    /// Engine tag as printed in voice listings.
    pub fn label(self) -> &'static str {
        match self {
            EngineKind::CosyVoice => "cosyvoice",
            EngineKind::Piper => "piper",
        }
    }
}

/// Voice gender tag, displayed with the catalog's Chinese labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "女",
            Gender::Male => "男",
        }
    }

    /// Parse a user-supplied gender filter (`女`/`男`, `f`/`m`,
    /// `female`/`male`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "女" | "f" | "female" => Some(Gender::Female),
            "男" | "m" | "male" => Some(Gender::Male),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// Static metadata for a single catalog voice.
#[derive(Debug)]
pub struct Voice {
    /// Identifier passed to the backend (e.g. `"longwan"`,
    /// `"zh_CN-huayan-medium"`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    pub gender: Gender,
    /// Short style description.
    pub style: &'static str,
    /// Recommended usage scenes.
    pub scene: &'static str,
    /// Backend this voice belongs to.
    pub engine: EngineKind,
}

/// Default voice when nothing is requested or no description matches.
pub const DEFAULT_VOICE: &str = "longwan";

/// Default voice of the local engine, used when the cloud backend is
/// unavailable.
pub const LOCAL_DEFAULT_VOICE: &str = "zh_CN-huayan-medium";

// ---------------------------------------------------------------------------
// Cloud catalog (CosyVoice)
// ---------------------------------------------------------------------------

/// DashScope CosyVoice timbres.
pub const CLOUD_VOICES: &[Voice] = &[
    Voice {
        id: "longwan",
        name: "龙婉",
        gender: Gender::Female,
        style: "优雅知性",
        scene: "语音助手、导航播报、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longcheng",
        name: "龙橙",
        gender: Gender::Female,
        style: "清新甜美",
        scene: "语音助手、导航播报、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longhua",
        name: "龙华",
        gender: Gender::Female,
        style: "温柔大方",
        scene: "语音助手、导航播报、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longxiaochun",
        name: "龙小淳",
        gender: Gender::Female,
        style: "活泼可爱",
        scene: "语音助手、聊天数字人（中英文）",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longxiaoxia",
        name: "龙小夏",
        gender: Gender::Female,
        style: "温柔亲切",
        scene: "语音助手、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longxiaocheng",
        name: "龙小诚",
        gender: Gender::Male,
        style: "成熟稳重",
        scene: "语音助手、导航播报（中英文）",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longxiaobai",
        name: "龙小白",
        gender: Gender::Female,
        style: "清新自然",
        scene: "聊天数字人、有声书、语音助手",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longlaotie",
        name: "龙老铁",
        gender: Gender::Male,
        style: "东北口音",
        scene: "新闻播报、有声书、直播带货",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longshu",
        name: "龙书",
        gender: Gender::Female,
        style: "知性优雅",
        scene: "有声书、新闻播报、智能客服",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longshuo",
        name: "龙硕",
        gender: Gender::Male,
        style: "沉稳专业",
        scene: "新闻播报、客服催收",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longjing",
        name: "龙婧",
        gender: Gender::Female,
        style: "干练利落",
        scene: "新闻播报、客服催收",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longmiao",
        name: "龙妙",
        gender: Gender::Female,
        style: "亲切温和",
        scene: "客服催收、有声书、语音助手",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longyue",
        name: "龙悦",
        gender: Gender::Female,
        style: "悦耳动听",
        scene: "诗词朗诵、有声书、新闻播报",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longyuan",
        name: "龙媛",
        gender: Gender::Female,
        style: "温婉柔和",
        scene: "有声书、语音助手、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longfei",
        name: "龙飞",
        gender: Gender::Male,
        style: "浑厚有力",
        scene: "会议播报、新闻播报、有声书",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longjielidou",
        name: "龙杰力豆",
        gender: Gender::Male,
        style: "活泼有趣",
        scene: "新闻播报、有声书、聊天助手（中英文）",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longtong",
        name: "龙彤",
        gender: Gender::Female,
        style: "甜美可爱",
        scene: "有声书、导航播报、聊天数字人",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "longxiang",
        name: "龙祥",
        gender: Gender::Male,
        style: "阳光正气",
        scene: "新闻播报、有声书、导航播报",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "loongstella",
        name: "Stella",
        gender: Gender::Female,
        style: "国际范儿",
        scene: "语音助手、直播带货（中英文）",
        engine: EngineKind::CosyVoice,
    },
    Voice {
        id: "loongbella",
        name: "Bella",
        gender: Gender::Female,
        style: "亲和力强",
        scene: "智能客服、新闻播报、对话闲聊",
        engine: EngineKind::CosyVoice,
    },
];

// ---------------------------------------------------------------------------
// Local catalog (Piper)
// ---------------------------------------------------------------------------

/// Piper neural voices available for offline synthesis. The id doubles as the
/// model file stem under the piper voices directory.
pub const LOCAL_VOICES: &[Voice] = &[
    Voice {
        id: "zh_CN-huayan-medium",
        name: "华颜",
        gender: Gender::Female,
        style: "平稳自然",
        scene: "离线播报、语音助手",
        engine: EngineKind::Piper,
    },
    Voice {
        id: "zh_CN-huayan-x_low",
        name: "华颜（快速）",
        gender: Gender::Female,
        style: "轻量快速",
        scene: "低配设备、离线播报",
        engine: EngineKind::Piper,
    },
    Voice {
        id: "en_US-lessac-medium",
        name: "Lessac",
        gender: Gender::Female,
        style: "clear English",
        scene: "英文播报",
        engine: EngineKind::Piper,
    },
];

// ---------------------------------------------------------------------------
// Keyword table
// ---------------------------------------------------------------------------

/// Descriptive keyword → candidate cloud voices. Used by [`match_voice`]
/// when the query is neither a known id nor a known display name.
static VOICE_KEYWORDS: &[(&str, &[&str])] = &[
    ("男", &["longxiaocheng", "longlaotie", "longshuo", "longfei", "longjielidou", "longxiang"]),
    ("女", &[
        "longwan", "longcheng", "longhua", "longxiaochun", "longxiaoxia", "longxiaobai",
        "longshu", "longjing", "longmiao", "longyue", "longyuan", "longtong",
        "loongstella", "loongbella",
    ]),
    ("温柔", &["longwan", "longxiaoxia", "longhua", "longyuan"]),
    ("活泼", &["longxiaochun", "longtong", "longjielidou"]),
    ("成熟", &["longxiaocheng", "longshuo", "longfei"]),
    ("年轻", &["longxiaobai", "longxiaochun", "longtong"]),
    ("新闻", &["longshuo", "longfei", "longxiang", "longjing"]),
    ("有声书", &["longshu", "longyue", "longyuan", "longfei"]),
    ("客服", &["longshu", "longmiao", "loongbella"]),
    ("东北", &["longlaotie"]),
    ("知性", &["longwan", "longshu"]),
    ("甜美", &["longcheng", "longtong"]),
    ("专业", &["longxiaocheng", "longshuo"]),
];

// ---------------------------------------------------------------------------
// Lookup and matching
// ---------------------------------------------------------------------------

/// Exact id lookup across both catalogs.
pub fn find_voice(id: &str) -> Option<&'static Voice> {
    CLOUD_VOICES
        .iter()
        .chain(LOCAL_VOICES.iter())
        .find(|v| v.id == id)
}

/// Default catalog entry for the given engine.
pub fn default_voice(engine: EngineKind) -> &'static Voice {
    let id = match engine {
        EngineKind::CosyVoice => DEFAULT_VOICE,
        EngineKind::Piper => LOCAL_DEFAULT_VOICE,
    };
    // Both defaults are catalog constants.
    find_voice(id).unwrap_or(&CLOUD_VOICES[0])
}

/// Resolve a free-form description to a catalog voice.
///
/// Resolution order:
/// 1. exact id match (idempotent for valid ids);
/// 2. display name or id appearing as a substring of the query;
/// 3. keyword scoring — count how many keywords associated with each voice
///    appear in the query, highest count wins, ties broken by catalog order;
/// 4. no keyword matches at all → [`DEFAULT_VOICE`].
pub fn match_voice(description: &str) -> &'static Voice {
    let trimmed = description.trim();
    if let Some(v) = find_voice(trimmed) {
        return v;
    }
    let query = trimmed.to_lowercase();
    if let Some(v) = find_voice(query.as_str()) {
        return v;
    }

    for v in CLOUD_VOICES {
        if query.contains(v.name) || query.contains(v.id) {
            return v;
        }
    }

    let mut scores: Vec<(&'static str, usize)> = Vec::new();
    for (keyword, voices) in VOICE_KEYWORDS {
        if query.contains(keyword) {
            for &id in *voices {
                match scores.iter_mut().find(|(v, _)| *v == id) {
                    Some((_, n)) => *n += 1,
                    None => scores.push((id, 1)),
                }
            }
        }
    }

    let mut best: Option<(&'static Voice, usize)> = None;
    for v in CLOUD_VOICES {
        let count = scores
            .iter()
            .find(|(id, _)| *id == v.id)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        if count > 0 && best.map_or(true, |(_, b)| count > b) {
            best = Some((v, count));
        }
    }

    match best {
        Some((v, _)) => v,
        None => default_voice(EngineKind::CosyVoice),
    }
}

/// List catalog voices, optionally filtered by gender and engine.
pub fn list_voices(gender: Option<Gender>, engine: Option<EngineKind>) -> Vec<&'static Voice> {
    CLOUD_VOICES
        .iter()
        .chain(LOCAL_VOICES.iter())
        .filter(|v| gender.map_or(true, |g| v.gender == g))
        .filter(|v| engine.map_or(true, |e| v.engine == e))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_voice_known_ids() {
        assert_eq!(find_voice("longwan").unwrap().name, "龙婉");
        assert_eq!(
            find_voice("zh_CN-huayan-medium").unwrap().engine,
            EngineKind::Piper
        );
        assert!(find_voice("does-not-exist").is_none());
    }

    #[test]
    fn match_valid_id_is_idempotent() {
        for v in CLOUD_VOICES.iter().chain(LOCAL_VOICES.iter()) {
            assert_eq!(match_voice(v.id).id, v.id);
        }
    }

    #[test]
    fn match_by_display_name_substring() {
        assert_eq!(match_voice("我想要龙老铁那种声音").id, "longlaotie");
    }

    #[test]
    fn match_by_keywords_picks_highest_score() {
        // "温柔" + "女" both hit longwan/longhua/longxiaoxia/longyuan (2 each);
        // longwan comes first in the catalog.
        assert_eq!(match_voice("温柔的女声").id, "longwan");
    }

    #[test]
    fn match_news_anchor_description() {
        let v = match_voice("像新闻主播一样专业");
        // "新闻" and "专业" both point at longshuo (2 hits).
        assert_eq!(v.id, "longshuo");
    }

    #[test]
    fn match_unrecognised_falls_back_to_default() {
        assert_eq!(match_voice("quacks like a duck").id, DEFAULT_VOICE);
        assert_eq!(match_voice("").id, DEFAULT_VOICE);
    }

    #[test]
    fn default_voices_exist_in_catalogs() {
        assert_eq!(default_voice(EngineKind::CosyVoice).id, DEFAULT_VOICE);
        assert_eq!(default_voice(EngineKind::Piper).id, LOCAL_DEFAULT_VOICE);
    }

    #[test]
    fn keyword_table_only_references_catalog_ids() {
        for (_, voices) in VOICE_KEYWORDS {
            for id in *voices {
                assert!(find_voice(id).is_some(), "unknown id {id} in keyword table");
            }
        }
    }

    #[test]
    fn list_voices_filters() {
        let males = list_voices(Some(Gender::Male), None);
        assert!(!males.is_empty());
        assert!(males.iter().all(|v| v.gender == Gender::Male));

        let piper = list_voices(None, Some(EngineKind::Piper));
        assert_eq!(piper.len(), LOCAL_VOICES.len());

        let all = list_voices(None, None);
        assert_eq!(all.len(), CLOUD_VOICES.len() + LOCAL_VOICES.len());
    }

    #[test]
    fn gender_parse_accepts_common_spellings() {
        assert_eq!(Gender::parse("女"), Some(Gender::Female));
        assert_eq!(Gender::parse("M"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("robot"), None);
    }
}
