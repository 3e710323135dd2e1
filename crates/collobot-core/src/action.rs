/// A user action decoded from a callback token.
///
/// Tokens are decoded once at the transport boundary; handlers match on
/// the closed enum so every variant is handled explicitly. Anything that
/// does not decode is an unknown action and changes no state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenCategory(String),
    AddExpression { category: String, index: usize },
    SaveFile,
    ClearSelection,
    BackToStart,
}

impl Action {
    /// Decodes a callback token. Returns `None` for anything malformed.
    pub fn decode(token: &str) -> Option<Self> {
        match token {
            "save_file" => return Some(Self::SaveFile),
            "clear_selection" => return Some(Self::ClearSelection),
            "back_to_start" => return Some(Self::BackToStart),
            _ => {}
        }

        if let Some(id) = token.strip_prefix("cat_") {
            if id.is_empty() {
                return None;
            }
            return Some(Self::OpenCategory(id.to_string()));
        }

        if let Some(rest) = token.strip_prefix("add_") {
            // Split on the LAST separator so category ids containing `_`
            // (e.g. `south_america`) survive the round trip.
            let (category, index) = rest.rsplit_once('_')?;
            if category.is_empty() {
                return None;
            }
            let index = index.parse::<usize>().ok()?;
            return Some(Self::AddExpression {
                category: category.to_string(),
                index,
            });
        }

        None
    }

    /// The token the renderer embeds in a button for this action.
    pub fn token(&self) -> String {
        match self {
            Self::OpenCategory(id) => format!("cat_{id}"),
            Self::AddExpression { category, index } => format!("add_{category}_{index}"),
            Self::SaveFile => "save_file".to_string(),
            Self::ClearSelection => "clear_selection".to_string(),
            Self::BackToStart => "back_to_start".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_add_token() {
        assert_eq!(
            Action::decode("add_travel_3"),
            Some(Action::AddExpression {
                category: "travel".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn add_token_tolerates_separators_in_the_category_id() {
        assert_eq!(
            Action::decode("add_south_america_2"),
            Some(Action::AddExpression {
                category: "south_america".to_string(),
                index: 2
            })
        );
    }

    #[test]
    fn decodes_fixed_tokens() {
        assert_eq!(Action::decode("save_file"), Some(Action::SaveFile));
        assert_eq!(Action::decode("clear_selection"), Some(Action::ClearSelection));
        assert_eq!(Action::decode("back_to_start"), Some(Action::BackToStart));
        assert_eq!(
            Action::decode("cat_grammar"),
            Some(Action::OpenCategory("grammar".to_string()))
        );
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert_eq!(Action::decode(""), None);
        assert_eq!(Action::decode("cat_"), None);
        assert_eq!(Action::decode("add_"), None);
        assert_eq!(Action::decode("add_travel"), None);
        assert_eq!(Action::decode("add_travel_x"), None);
        assert_eq!(Action::decode("add__3"), None);
        assert_eq!(Action::decode("delete_everything"), None);
    }

    #[test]
    fn tokens_round_trip() {
        let actions = [
            Action::OpenCategory("south_america".to_string()),
            Action::AddExpression {
                category: "south_america".to_string(),
                index: 12,
            },
            Action::SaveFile,
            Action::ClearSelection,
            Action::BackToStart,
        ];
        for action in actions {
            assert_eq!(Action::decode(&action.token()), Some(action));
        }
    }
}
