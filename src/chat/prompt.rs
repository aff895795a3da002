use crate::auth::repo::User;

/// Longest user message we forward; anything beyond is cut so a single chat
/// turn stays a bounded prompt.
const MAX_MESSAGE_CHARS: usize = 2000;

/// Compose the instruction-plus-context prompt for one chat turn.
pub fn build_prompt(user: &User, message: &str) -> String {
    let message = truncate_chars(message.trim(), MAX_MESSAGE_CHARS);

    format!(
        "You are an assistant specializing in nutrition, health and exercise. \
You give personalized recommendations based on the user's data.\n\
\n\
User data:\n\
- Name: {name}\n\
- Age: {age} years\n\
- Weight: {weight} kg\n\
- Height: {height} cm\n\
\n\
You help the user with:\n\
- Healthy eating advice\n\
- Recipes suited to their profile\n\
- Exercise routines recommended for their weight and height\n\
- General wellbeing tips\n\
\n\
Only answer questions related to these topics and provide reliable, useful \
information. Do NOT use asterisk formatting, plain text only.\n\
\n\
User question: {message}",
        name = user.name,
        age = user.age,
        weight = user.weight_kg,
        height = user.height_cm,
        message = message,
    )
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            password_hash: "hash".into(),
            name: "Ana".into(),
            surname: "Lopez".into(),
            age: 29,
            height_cm: 165.0,
            weight_kg: 60.0,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn prompt_carries_profile_and_question() {
        let prompt = build_prompt(&user(), "what should I eat for breakfast?");
        assert!(prompt.contains("Name: Ana"));
        assert!(prompt.contains("Age: 29 years"));
        assert!(prompt.contains("Weight: 60 kg"));
        assert!(prompt.contains("Height: 165 cm"));
        assert!(prompt.ends_with("User question: what should I eat for breakfast?"));
    }

    #[test]
    fn overlong_messages_are_cut() {
        let long = "x".repeat(MAX_MESSAGE_CHARS * 2);
        let prompt = build_prompt(&user(), &long);
        let question = prompt.split("User question: ").nth(1).unwrap();
        assert_eq!(question.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "é".repeat(10);
        assert_eq!(truncate_chars(&s, 3).chars().count(), 3);
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
