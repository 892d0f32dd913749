//! Shallow phrase analysis for clause text.
//!
//! Turns condition sentences and conclusion actions into [`Proposition`]s:
//! a subject role, a lemmatized verb, and an object role. This is not a
//! parser. It strips determiners, finds the verb with a small closed lexicon,
//! and falls back to positional rules; the result only needs to be stable so
//! that equal phrasings map to equal signatures.

use lexowl_ontology::Signature;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "any", "your", "its", "their", "our",
    "my", "his", "her", "each", "every",
];

/// Words that carry no predicate content of their own.
const FILLERS: &[&str] = &["so", "it", "always", "then", "also", "only", "just", "please"];

/// Subordinating words that may open a condition.
const CONDITION_OPENERS: &[&str] = &["if", "when", "where", "while", "whenever", "once"];

/// Finite verb forms recognized as the verb of a condition.
const LINKING_VERBS: &[&str] = &[
    "is", "are", "was", "were", "am", "be", "been", "has", "have", "had", "does", "do", "did",
    "can", "could", "may", "might", "must", "should", "will", "would", "shall",
];

/// Lemmas that cannot form an observable action on their own.
const AUXILIARIES: &[&str] = &[
    "be", "have", "do", "can", "could", "may", "might", "must", "should", "will", "would",
    "shall",
];

const MODAL_PREFIXES: &[&str] = &["must", "should", "shall", "to"];

const NEGATIONS: &[&str] = &["not", "never"];

/// A subject–verb–object reading of a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposition {
    /// Content tokens of the subject role.
    pub subject: Vec<String>,
    /// Lemmatized verb, prefixed with `"not "` for negated actions.
    pub verb: String,
    /// Content tokens after the verb.
    pub object: Vec<String>,
}

impl Proposition {
    /// Semantic signature of the proposition.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            verb: self.verb.clone(),
            subject: self.subject.clone(),
            object: self.object.clone(),
        }
    }

    /// Class-style name: subject, third-person verb, object, in UpperCamel.
    #[must_use]
    pub fn tag_name(&self) -> String {
        let verb = third_person(&self.verb);
        let words: Vec<&str> = self
            .subject
            .iter()
            .map(String::as_str)
            .chain(verb.split(' '))
            .chain(self.object.iter().map(String::as_str))
            .collect();
        upper_camel(&words)
    }

    /// Property-style name: verb then object, in lowerCamel.
    #[must_use]
    pub fn predicate_name(&self) -> String {
        lower_camel(&self.action_words())
    }

    /// Verb and object words, used for predicate names and derived rule tags.
    #[must_use]
    pub fn action_words(&self) -> Vec<&str> {
        self.verb
            .split(' ')
            .chain(self.object.iter().map(String::as_str))
            .collect()
    }

    /// Readable label for the emitted `rdfs:label`.
    #[must_use]
    pub fn label(&self) -> String {
        let verb = if self.subject.is_empty() {
            self.verb.clone()
        } else {
            third_person(&self.verb)
        };
        self.subject
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(verb.as_str()))
            .chain(self.object.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lowercases `text`, folds compatibility forms (`²` to `2`), drops
/// apostrophes and combining marks, and splits on anything that may not
/// appear in a Turtle local name.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .split(|c: char| !is_name_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Letters and digits in the Turtle `PN_CHARS_BASE` ranges.
fn is_name_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric();
    }
    c.is_alphanumeric()
        && matches!(
            u32::from(c),
            0xC0..=0xD6
                | 0xD8..=0xF6
                | 0xF8..=0x2FF
                | 0x370..=0x37D
                | 0x37F..=0x1FFF
                | 0x2070..=0x218F
                | 0x2C00..=0x2FEF
                | 0x3001..=0xD7FF
                | 0xF900..=0xFDCF
                | 0xFDF0..=0xFFFD
                | 0x10000..=0xEFFFF
        )
}

/// Tokenizes and removes determiners.
#[must_use]
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !DETERMINERS.contains(&t.as_str()))
        .collect()
}

/// Returns true if the token sequence of `cue` occurs in `tokens`.
#[must_use]
pub fn contains_phrase(tokens: &[String], cue: &str) -> bool {
    let cue = tokenize(cue);
    !cue.is_empty() && tokens.windows(cue.len()).any(|window| window == cue.as_slice())
}

/// Reads a condition sentence as subject–verb–object.
///
/// The verb is the first linking verb after the first token, or else the
/// second token. `there is X` reads as `X exists`. Returns `None` when fewer
/// than two content tokens remain.
#[must_use]
pub fn parse_condition(text: &str) -> Option<Proposition> {
    let mut tokens = content_tokens(text);
    while tokens
        .first()
        .is_some_and(|t| CONDITION_OPENERS.contains(&t.as_str()))
    {
        tokens.remove(0);
    }
    if tokens.len() < 2 {
        return None;
    }

    let verb_at = tokens
        .iter()
        .skip(1)
        .position(|t| LINKING_VERBS.contains(&t.as_str()))
        .map_or(1, |i| i + 1);
    let verb = lemma(&tokens[verb_at]);
    let subject = tokens[..verb_at].to_vec();
    let object = tokens[verb_at + 1..].to_vec();

    if subject == ["there"] && verb == "be" {
        if object.is_empty() {
            return None;
        }
        return Some(Proposition {
            subject: object,
            verb: "exist".to_string(),
            object: Vec::new(),
        });
    }

    Some(Proposition {
        subject,
        verb,
        object,
    })
}

/// Reads an imperative action (`"stop behind the line"`).
///
/// Leading modals are skipped and a leading `not`/`never` negates the verb.
/// Returns `None` when nothing observable remains: no content tokens, or a
/// bare auxiliary such as `"do so"`.
#[must_use]
pub fn parse_action(text: &str) -> Option<Proposition> {
    let mut tokens: Vec<String> = content_tokens(text)
        .into_iter()
        .filter(|t| !FILLERS.contains(&t.as_str()))
        .collect();
    while tokens
        .first()
        .is_some_and(|t| MODAL_PREFIXES.contains(&t.as_str()))
    {
        tokens.remove(0);
    }
    let negated = tokens
        .first()
        .is_some_and(|t| NEGATIONS.contains(&t.as_str()));
    if negated {
        tokens.remove(0);
    }
    let (head, object) = tokens.split_first()?;
    let verb = lemma(head);
    if object.is_empty() && AUXILIARIES.contains(&verb.as_str()) {
        return None;
    }
    Some(Proposition {
        subject: Vec::new(),
        verb: if negated { format!("not {verb}") } else { verb },
        object: object.to_vec(),
    })
}

/// Splits a conclusion into action parts on `;`, `,` and the word `and`.
///
/// A one-word fragment stays attached to the part before it, so
/// `"stop and wait"` is one action while
/// `"stop behind the line and give way"` is two.
#[must_use]
pub fn split_actions(conclusion: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for chunk in conclusion.split([';', ',']) {
        let mut current: Vec<&str> = Vec::new();
        let mut pieces: Vec<String> = Vec::new();
        for word in chunk.split_whitespace() {
            if word.eq_ignore_ascii_case("and") {
                pieces.push(current.join(" "));
                current.clear();
            } else {
                current.push(word);
            }
        }
        pieces.push(current.join(" "));

        for piece in pieces {
            let words = piece.split_whitespace().count();
            if words == 0 {
                continue;
            }
            match parts.last_mut() {
                Some(previous) if words == 1 => {
                    previous.push_str(" and ");
                    previous.push_str(&piece);
                }
                _ => parts.push(piece),
            }
        }
    }
    parts
}

/// Lemmatizes a verb form with an irregular table and suffix rules.
#[must_use]
pub fn lemma(word: &str) -> String {
    match word {
        "is" | "are" | "was" | "were" | "am" | "been" | "being" | "be" => return "be".to_string(),
        "has" | "have" | "had" | "having" => return "have".to_string(),
        "does" | "do" | "did" | "done" => return "do".to_string(),
        _ => {}
    }
    if AUXILIARIES.contains(&word) {
        return word.to_string();
    }
    let len = word.len();
    if len > 4 && word.ends_with("ies") {
        format!("{}y", &word[..len - 3])
    } else if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
        || word.ends_with("zes")
    {
        word[..len - 2].to_string()
    } else if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        word[..len - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Third-person singular form of a lemma (`"have"` → `"has"`).
#[must_use]
pub fn third_person(lemma: &str) -> String {
    if let Some(rest) = lemma.strip_prefix("not ") {
        return format!("does not {rest}");
    }
    match lemma {
        "be" => return "is".to_string(),
        "have" => return "has".to_string(),
        "do" => return "does".to_string(),
        _ => {}
    }
    if AUXILIARIES.contains(&lemma) {
        return lemma.to_string();
    }
    let bytes = lemma.as_bytes();
    let consonant_y = lemma.ends_with('y')
        && bytes.len() > 1
        && !b"aeiou".contains(&bytes[bytes.len() - 2]);
    if consonant_y {
        format!("{}ies", &lemma[..lemma.len() - 1])
    } else if ["s", "sh", "ch", "x", "z", "o"].iter().any(|s| lemma.ends_with(s)) {
        format!("{lemma}es")
    } else {
        format!("{lemma}s")
    }
}

/// Joins words in UpperCamel case.
#[must_use]
pub fn upper_camel<S: AsRef<str>>(words: &[S]) -> String {
    words.iter().map(|w| capitalize(w.as_ref())).collect()
}

/// Joins words in lowerCamel case.
#[must_use]
pub fn lower_camel<S: AsRef<str>>(words: &[S]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.as_ref().to_lowercase());
        } else {
            out.push_str(&capitalize(word.as_ref()));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn condition_with_possessive_verb() {
        let p = parse_condition("the junction has a 'Stop' sign");
        assert_eq!(
            p,
            Some(Proposition {
                subject: words(&["junction"]),
                verb: "have".to_string(),
                object: words(&["stop", "sign"]),
            })
        );
        assert_eq!(p.map(|p| p.tag_name()).as_deref(), Some("JunctionHasStopSign"));
    }

    #[test]
    fn expletive_there_reads_as_existence() {
        let p = parse_condition("there is a safe gap in the traffic");
        assert_eq!(
            p.as_ref().map(Proposition::tag_name).as_deref(),
            Some("SafeGapInTrafficExists")
        );
        assert_eq!(p.map(|p| p.verb), Some("exist".to_string()));
    }

    #[test]
    fn multi_word_subject_before_linking_verb() {
        let p = parse_condition("if the traffic lights are red");
        assert_eq!(
            p.map(|p| (p.subject, p.verb, p.object)),
            Some((words(&["traffic", "lights"]), "be".to_string(), words(&["red"])))
        );
    }

    #[test]
    fn fallback_verb_is_second_token() {
        let p = parse_condition("the light flashes");
        assert_eq!(p.map(|p| p.tag_name()).as_deref(), Some("LightFlashes"));
    }

    #[test]
    fn tokens_fold_to_local_name_characters() {
        assert_eq!(tokenize("10 m²"), vec!["10", "m2"]);
        assert_eq!(tokenize("½ mile"), vec!["1", "2", "mile"]);
        assert_eq!(tokenize("Café crème"), vec!["cafe", "creme"]);
        assert_eq!(tokenize("nº 5 ª"), vec!["no", "5", "a"]);
        assert_eq!(tokenize("x·y"), vec!["x", "y"]);
    }

    #[test]
    fn condition_needs_subject_and_verb() {
        assert_eq!(parse_condition("junction"), None);
        assert_eq!(parse_condition("the"), None);
        assert_eq!(parse_condition(""), None);
        assert_eq!(parse_condition("there is"), None);
    }

    #[test]
    fn determiners_do_not_change_signature() {
        let a = parse_condition("the junction has a 'Stop' sign").map(|p| p.signature());
        let b = parse_condition("a junction has the STOP sign").map(|p| p.signature());
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn action_names() {
        let p = parse_action("stop behind the line at a junction");
        assert_eq!(
            p.map(|p| p.predicate_name()).as_deref(),
            Some("stopBehindLineAtJunction")
        );
        let p = parse_action("must not park on the zigzag lines");
        assert_eq!(
            p.map(|p| p.predicate_name()).as_deref(),
            Some("notParkOnZigzagLines")
        );
    }

    #[test]
    fn non_observable_actions() {
        assert_eq!(parse_action("do so"), None);
        assert_eq!(parse_action("always"), None);
        assert_eq!(parse_action(""), None);
        assert!(parse_action("be careful").is_some());
    }

    #[test]
    fn split_on_and_keeps_single_word_fragments() {
        assert_eq!(
            split_actions("stop behind the line and give way"),
            vec!["stop behind the line", "give way"]
        );
        assert_eq!(split_actions("stop and wait"), vec!["stop and wait"]);
        assert_eq!(
            split_actions("slow down; look left, look right"),
            vec!["slow down", "look left", "look right"]
        );
        assert!(split_actions(" , ; ").is_empty());
    }

    #[test]
    fn lemma_and_third_person() {
        assert_eq!(lemma("stops"), "stop");
        assert_eq!(lemma("carries"), "carry");
        assert_eq!(lemma("passes"), "pass");
        assert_eq!(lemma("pass"), "pass");
        assert_eq!(lemma("focus"), "focus");
        assert_eq!(third_person("carry"), "carries");
        assert_eq!(third_person("pass"), "passes");
        assert_eq!(third_person("stay"), "stays");
        assert_eq!(third_person("exist"), "exists");
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        let tokens = tokenize("You have to stop; it is the law");
        assert!(contains_phrase(&tokens, "have to"));
        assert!(contains_phrase(&tokens, "law"));
        assert!(!contains_phrase(&tokens, "must"));
        assert!(!contains_phrase(&tokenize("lawn mower"), "law"));
    }

    #[test]
    fn camel_case() {
        assert_eq!(upper_camel(&["ego", "at", "junction"]), "EgoAtJunction");
        assert_eq!(lower_camel(&["Move", "off"]), "moveOff");
    }
}
