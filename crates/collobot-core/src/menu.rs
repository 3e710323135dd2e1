use crate::{
    action::Action,
    catalog::Catalog,
    messaging::types::{InlineButton, InlineKeyboard},
};

/// A rendered screen: message text plus its inline keyboard.
///
/// Rendering is pure; identical inputs produce identical screens, which is
/// what the tests rely on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: InlineKeyboard,
}

/// Static text shown while the upstream pipeline has not delivered a
/// catalog yet.
pub fn catalog_pending() -> &'static str {
    "⏳ Collocations are being prepared. Please wait a moment and try again."
}

/// The category list: one button per category plus the save/clear row.
pub fn category_list(catalog: &Catalog, user_name: &str, selected_count: usize) -> Screen {
    let mut rows: Vec<Vec<InlineButton>> = catalog
        .iter()
        .map(|(id, entry)| {
            vec![InlineButton::new(
                entry.name.clone(),
                Action::OpenCategory(id.to_string()).token(),
            )]
        })
        .collect();

    rows.push(vec![
        InlineButton::new("💾 Save & Download", Action::SaveFile.token()),
        InlineButton::new("🗑️ Clear All", Action::ClearSelection.token()),
    ]);

    let text = format!(
        "👋 Hello {user_name}!\n\n\
         B2+ Video Collocations Selector\n\
         🎯 Topic: {topic}\n\n\
         📊 Selected so far: {selected_count} expressions\n\n\
         How to use:\n\
         1. Choose a category below\n\
         2. Click any expression to add it\n\
         3. Click \"Save & Download\" when done\n\n\
         Select a category:",
        topic = catalog.topic(),
    );

    Screen {
        text,
        keyboard: InlineKeyboard::new(rows),
    }
}

/// One category's expressions, addressed by position within this render.
pub fn category_detail(
    category_id: &str,
    name: &str,
    expressions: &[String],
    max_label: usize,
) -> Screen {
    let mut rows: Vec<Vec<InlineButton>> = expressions
        .iter()
        .enumerate()
        .map(|(index, expression)| {
            vec![InlineButton::new(
                truncate_label(expression, max_label),
                Action::AddExpression {
                    category: category_id.to_string(),
                    index,
                }
                .token(),
            )]
        })
        .collect();

    rows.push(vec![
        InlineButton::new("🔙 Back to Categories", Action::BackToStart.token()),
        InlineButton::new("💾 Save & Download", Action::SaveFile.token()),
    ]);

    let text = format!("📚 {name}\n\nClick any expression to add it to your collection.");

    Screen {
        text,
        keyboard: InlineKeyboard::new(rows),
    }
}

/// Post-save confirmation with follow-up navigation.
pub fn save_confirmation(filename: &str, count: usize) -> Screen {
    let rows = vec![
        vec![InlineButton::new(
            "📚 Select More",
            Action::BackToStart.token(),
        )],
        vec![InlineButton::new(
            "🗑️ Start Over",
            Action::ClearSelection.token(),
        )],
    ];

    let text = format!(
        "✅ File Saved Successfully!\n\n\
         📁 Filename: {filename}\n\
         📊 Expressions saved: {count}"
    );

    Screen {
        text,
        keyboard: InlineKeyboard::new(rows),
    }
}

fn truncate_label(s: &str, max_label: usize) -> String {
    if s.chars().count() > max_label {
        format!("{}...", s.chars().take(max_label).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "_metadata": { "topic": "Travel" },
                "south_america": {
                    "name": "South America",
                    "expressions": ["off the beaten track", "hit the road"]
                },
                "food": { "name": "Food", "expressions": ["grab a bite"] }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn category_list_has_one_row_per_category_plus_actions() {
        let screen = category_list(&sample_catalog(), "Ann", 3);
        assert_eq!(screen.keyboard.rows.len(), 3);
        assert_eq!(screen.keyboard.rows[0][0].callback_data, "cat_south_america");
        assert_eq!(screen.keyboard.rows[1][0].callback_data, "cat_food");

        let actions = &screen.keyboard.rows[2];
        assert_eq!(actions[0].callback_data, "save_file");
        assert_eq!(actions[1].callback_data, "clear_selection");

        assert!(screen.text.contains("Hello Ann"));
        assert!(screen.text.contains("Topic: Travel"));
        assert!(screen.text.contains("Selected so far: 3"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let catalog = sample_catalog();
        assert_eq!(
            category_list(&catalog, "Ann", 1),
            category_list(&catalog, "Ann", 1)
        );
    }

    #[test]
    fn category_detail_encodes_positions() {
        let catalog = sample_catalog();
        let entry = catalog.get("south_america").unwrap();
        let screen = category_detail("south_america", &entry.name, &entry.expressions, 40);

        assert_eq!(screen.keyboard.rows.len(), 3);
        assert_eq!(
            screen.keyboard.rows[0][0].callback_data,
            "add_south_america_0"
        );
        assert_eq!(
            screen.keyboard.rows[1][0].callback_data,
            "add_south_america_1"
        );
        assert_eq!(screen.keyboard.rows[2][0].callback_data, "back_to_start");
        assert_eq!(screen.keyboard.rows[2][1].callback_data, "save_file");
    }

    #[test]
    fn long_labels_are_truncated_with_ellipsis() {
        let long = "a".repeat(60);
        let screen = category_detail("x", "X", &[long], 40);
        let label = &screen.keyboard.rows[0][0].label;
        assert_eq!(label.len(), 43);
        assert!(label.ends_with("..."));
    }

    #[test]
    fn short_labels_are_kept_verbatim() {
        let screen = category_detail("x", "X", &["hit the road".to_string()], 40);
        assert_eq!(screen.keyboard.rows[0][0].label, "hit the road");
    }

    #[test]
    fn save_confirmation_offers_follow_ups() {
        let screen = save_confirmation("travel_collocations_Ann_42.txt", 2);
        assert!(screen.text.contains("travel_collocations_Ann_42.txt"));
        assert!(screen.text.contains("Expressions saved: 2"));
        assert_eq!(screen.keyboard.rows[0][0].callback_data, "back_to_start");
        assert_eq!(screen.keyboard.rows[1][0].callback_data, "clear_selection");
    }
}
