//! Template-based card generator
//!
//! Deterministic: the same topic, detail, count and start id always produce
//! the same cards. Card `i` (0-based) uses template `i % TEMPLATES.len()`.

use crate::Card;

/// A question/answer pair of text builders taking `(topic, detail, index)`
///
/// `index` is 1-based. `detail` is empty when none was given.
#[derive(Clone, Copy)]
pub struct Template {
    pub question: fn(&str, &str, usize) -> String,
    pub answer: fn(&str, &str, usize) -> String,
}

pub const TEMPLATES: [Template; 5] = [
    Template {
        question: definition_question,
        answer: definition_answer,
    },
    Template {
        question: keyword_question,
        answer: keyword_answer,
    },
    Template {
        question: use_case_question,
        answer: use_case_answer,
    },
    Template {
        question: pitfall_question,
        answer: pitfall_answer,
    },
    Template {
        question: checkpoint_question,
        answer: checkpoint_answer,
    },
];

/// Generate `count` cards with ids `start_id..start_id + count`
///
/// Ids saturate at `u64::MAX`; callers reserve the range first.
pub fn generate(topic: &str, detail: &str, count: usize, start_id: u64) -> Vec<Card> {
    let topic = topic.trim();
    let detail = detail.trim();
    let category = category_for(topic, detail);

    (0..count)
        .map(|i| {
            let template = &TEMPLATES[i % TEMPLATES.len()];
            Card::new(
                start_id.saturating_add(i as u64),
                category.clone(),
                (template.question)(topic, detail, i + 1),
                (template.answer)(topic, detail, i + 1),
            )
        })
        .collect()
}

/// `topic`, or `topic / detail` when a detail is given
pub fn category_for(topic: &str, detail: &str) -> String {
    let (topic, detail) = (topic.trim(), detail.trim());
    if detail.is_empty() {
        topic.to_string()
    } else {
        format!("{} / {}", topic, detail)
    }
}

fn qualified(topic: &str, detail: &str) -> String {
    if detail.is_empty() {
        topic.to_string()
    } else {
        format!("{} ({})", topic, detail)
    }
}

fn or_default<'a>(detail: &'a str, fallback: &'a str) -> &'a str {
    if detail.is_empty() { fallback } else { detail }
}

fn definition_question(topic: &str, detail: &str, _: usize) -> String {
    format!("What is the most important definition of {}?", qualified(topic, detail))
}

fn definition_answer(topic: &str, detail: &str, _: usize) -> String {
    format!(
        "Structuring the definition:\n- Summary: explain the core meaning of {} in one sentence\n- Background: understand why it matters\n- Example: touch on {}",
        topic,
        or_default(detail, "key scenarios")
    )
}

fn keyword_question(topic: &str, _: &str, index: usize) -> String {
    format!("Key term #{} to know when learning {}?", index, topic)
}

fn keyword_answer(topic: &str, detail: &str, _: usize) -> String {
    format!(
        "Hints for the keyword:\n1. Basic vocabulary of {}\n2. Representative terms from {}\n3. A concrete phrase you can explain",
        topic,
        or_default(detail, "related areas")
    )
}

fn use_case_question(topic: &str, detail: &str, _: usize) -> String {
    format!("What is a typical example or use case of {}?", qualified(topic, detail))
}

fn use_case_answer(topic: &str, detail: &str, _: usize) -> String {
    format!(
        "Structuring an example:\n- Situation: where {} is used\n- Problem: the challenges in {}\n- Outcome: what improves",
        topic,
        or_default(detail, "the field")
    )
}

fn pitfall_question(topic: &str, _: &str, _: usize) -> String {
    format!("What are common misconceptions or pitfalls about {}?", topic)
}

fn pitfall_answer(topic: &str, detail: &str, _: usize) -> String {
    format!(
        "Avoiding misconceptions:\n- Essence: restate the goal of {}\n- Comparison: contrast with similar concepts\n- Practice: make the caveats for {} concrete",
        topic,
        or_default(detail, "practice")
    )
}

fn checkpoint_question(topic: &str, detail: &str, index: usize) -> String {
    format!("Review quiz for {}: what is checkpoint {}?", qualified(topic, detail), index)
}

fn checkpoint_answer(topic: &str, detail: &str, _: usize) -> String {
    format!(
        "Prepare a quick answer:\n- Prompt: how would you explain {}\n- Angle: add the perspective of {}\n- Wrap-up: an answer you can give in 30 seconds",
        topic,
        or_default(detail, "related areas")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ids_and_category() {
        let cards = generate("Topic", "", 3, 50);
        assert_eq!(cards.iter().map(|c| c.id).collect::<Vec<_>>(), vec![50, 51, 52]);
        assert!(cards.iter().all(|c| c.category == "Topic"));
        assert!(cards.iter().all(|c| c.easy_count == 0));

        for (i, card) in cards.iter().enumerate() {
            assert_eq!(card.question, (TEMPLATES[i].question)("Topic", "", i + 1));
            assert_eq!(card.answer, (TEMPLATES[i].answer)("Topic", "", i + 1));
        }
    }

    #[test]
    fn test_templates_cycle() {
        let cards = generate("Rust", "ownership", 7, 1);
        assert_eq!(cards[5].question, (TEMPLATES[0].question)("Rust", "ownership", 6));
        assert_eq!(cards[6].question, (TEMPLATES[1].question)("Rust", "ownership", 7));
        assert!(cards[6].question.contains("#7"));
    }

    #[test]
    fn test_detail_qualifies_category() {
        let cards = generate("  Rust ", " ownership ", 1, 1);
        assert_eq!(cards[0].category, "Rust / ownership");
        assert!(cards[0].question.contains("Rust (ownership)"));
    }

    #[test]
    fn test_whitespace_detail_is_ignored() {
        assert_eq!(category_for("Rust", "   "), "Rust");
    }

    #[test]
    fn test_zero_count() {
        assert!(generate("Rust", "", 0, 10).is_empty());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate("a", "b", 6, 3), generate("a", "b", 6, 3));
    }
}
