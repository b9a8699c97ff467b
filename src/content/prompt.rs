use chrono::NaiveDate;

use crate::config::GeneratorConfig;

pub fn build_prompt(config: &GeneratorConfig, today: NaiveDate, topic: &str, context: &str) -> String {
    format!(
        "You are a professional financial blogger. Write a blog post for today ({today}).

Topic: {topic}

Context Data:
{context}

Requirements:
1. Title: Catchy and relevant.
2. Content: Informative, easy to read, formatted with HTML (use <h2>, <p>, <ul>, <li>).
3. Tone: {tone}.
4. Language: {language}.
5. Length: About {min}-{max} words.

Output format:
Title: [Your Title Here]
Content: [Your HTML Content Here]
",
        today = today.format("%Y-%m-%d"),
        topic = topic,
        context = context.trim(),
        tone = config.tone,
        language = config.language,
        min = config.min_words,
        max = config.max_words,
    )
}
