// Language detection for user messages
//
// Detection is advisory: anything the detector cannot classify, or classifies
// with low confidence, falls back to DEFAULT_LANGUAGE instead of failing the
// request. Short greetings ("Hello", "ok") land in the low-confidence case.

use tracing::debug;
use whatlang::Lang;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Detector confidence below which a guess is discarded
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Detect the language of `text` as an ISO 639-1 tag where one is known,
/// otherwise the detector's ISO 639-3 code. Never fails.
pub fn detect_language(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }

    match whatlang::detect(trimmed) {
        Some(info) if info.is_reliable() || info.confidence() >= MIN_CONFIDENCE => {
            let tag = language_tag(info.lang());
            debug!(
                language = tag,
                confidence = info.confidence(),
                "Detected message language"
            );
            tag.to_string()
        }
        Some(info) => {
            debug!(
                guess = language_tag(info.lang()),
                confidence = info.confidence(),
                "Low-confidence language guess, using default"
            );
            DEFAULT_LANGUAGE.to_string()
        }
        None => {
            debug!("Language detection failed, using default");
            DEFAULT_LANGUAGE.to_string()
        }
    }
}

fn language_tag(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Fra => "fr",
        Lang::Ita => "it",
        Lang::Deu => "de",
        Lang::Nld => "nl",
        Lang::Swe => "sv",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Ell => "el",
        Lang::Heb => "he",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_fall_back_to_default() {
        assert_eq!(detect_language("1234567890"), DEFAULT_LANGUAGE);
        assert_eq!(detect_language("42 !!! ??"), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_empty_input_falls_back_to_default() {
        assert_eq!(detect_language(""), DEFAULT_LANGUAGE);
        assert_eq!(detect_language("   \n\t"), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_short_greetings_fall_back_to_default() {
        for text in ["Hello", "Hi", "ok", "thanks!", "Tell me a story"] {
            assert_eq!(detect_language(text), DEFAULT_LANGUAGE, "input {text:?}");
        }
    }

    #[test]
    fn test_detects_spanish() {
        let text = "Hola, me gustaría que escribieras una canción sobre el mar, \
                    las estrellas y la noche. Quiero que hable de un amor que \
                    regresa cada verano a la playa donde nos conocimos. También \
                    me gustaría que la canción tuviera un estribillo alegre, con \
                    guitarras y una voz que cante sobre la esperanza de volver.";
        assert_eq!(detect_language(text), "es");
    }

    #[test]
    fn test_detects_japanese_by_script() {
        assert_eq!(detect_language("こんにちは、歌を書いてください"), "ja");
    }
}
