//! Language detection.

use crate::models::Language;
use tracing::{debug, instrument};
use whatlang::{Lang, detect};

/// Best-guess language of `text`, or [`Language::Unknown`].
///
/// Empty input, input without any letters, or text whatlang cannot classify
/// all yield `Unknown`; this never fails.
#[instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn detect_language(text: &str) -> Language {
    if !text.chars().any(char::is_alphabetic) {
        return Language::Unknown;
    }

    match detect(text) {
        Some(info) => {
            let language = Language::Detected {
                code: lang_to_code(info.lang()).to_string(),
                confidence: info.confidence(),
                reliable: info.is_reliable(),
            };
            debug!(code = language.code(), confidence = info.confidence(), "Detected language");
            language
        }
        None => Language::Unknown,
    }
}

/// ISO 639-1 code where one exists, otherwise whatlang's ISO 639-3 code.
fn lang_to_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Ara => "ar",
        Lang::Urd => "ur",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Deu => "de",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ukr => "uk",
        Lang::Pes => "fa",
        Lang::Ben => "bn",
        Lang::Ind => "id",
        Lang::Ron => "ro",
        Lang::Ces => "cs",
        Lang::Ell => "el",
        Lang::Hun => "hu",
        other => other.code(),
    }
}
