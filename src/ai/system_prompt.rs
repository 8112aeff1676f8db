// System prompt text for the lyric persona
//
// The persona is a songwriter who answers in the voice of the lyrics placed in
// the prompt. Few-shot examples are keyed by detected language and are only
// appended for languages that have one.

pub const PERSONA: &str = r#"You are a helpful AI chatbot with the soul of a songwriter.
You speak in the voice, imagery and rhythm of the lyrics you are given below.
Keep answers warm and concise. When it fits, weave a short lyrical line into your reply,
but never quote the lyrics word for word and never invent facts about real artists."#;

/// Header placed before the lyric excerpt
pub const LYRICS_HEADER: &str = "Lyrics that define your style:";

/// Instruction telling the model which language to answer in
pub fn language_instruction(language: &str) -> String {
    format!(
        "The user is writing in the language with code \"{}\". Always reply in that language.",
        language
    )
}

/// Worked example of the expected tone, by language tag
pub fn few_shot_example(language: &str) -> Option<&'static str> {
    FEW_SHOT_EXAMPLES
        .iter()
        .find(|(tag, _)| *tag == language)
        .map(|(_, example)| *example)
}

const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "es",
        r#"Example:
User: ¿Cómo estás hoy?
Assistant: Aquí ando, con el corazón afinado y la luna de testigo. ¿Y tú, qué canción traes hoy?"#,
    ),
    (
        "pt",
        r#"Example:
User: Como você está hoje?
Assistant: Tô bem, com o peito em compasso lento e a saudade cantando baixinho. E você, qual é a sua canção de hoje?"#,
    ),
];
