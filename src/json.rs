use matrix_cfr::MatrixGame;
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
#[serde(untagged)]
enum Definition {
    Bare(Vec<Vec<f64>>),
    Named {
        actions: Option<Vec<String>>,
        matrix: Vec<Vec<f64>>,
    },
}

pub fn from_reader(reader: impl Read) -> (MatrixGame, Vec<String>) {
    let definition = serde_json::from_reader(reader).expect(
        "couldn't parse json game definition : https://github.com/erikbrinkman/matrix-cfr#json-error",
    );
    from_definition(definition)
}

fn from_definition(definition: Definition) -> (MatrixGame, Vec<String>) {
    let (actions, matrix) = match definition {
        Definition::Bare(matrix) => (None, matrix),
        Definition::Named { actions, matrix } => (actions, matrix),
    };
    let game = MatrixGame::new(matrix).expect(
        "couldn't interpret payoffs as a playable game : https://github.com/erikbrinkman/matrix-cfr#game-error",
    );
    let actions = match actions {
        Some(actions) => {
            assert!(
                actions.len() == game.num_actions(),
                "found {} action names for a game with {} actions : https://github.com/erikbrinkman/matrix-cfr#game-error",
                actions.len(),
                game.num_actions(),
            );
            actions
        }
        None => (0..game.num_actions()).map(|ind| format!("a{}", ind)).collect(),
    };
    (game, actions)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_bare() {
        let (game, actions) =
            super::from_reader(r#"[[0.0, -1.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 1.0, 0.0]]"#.as_bytes());
        assert_eq!(game.num_actions(), 3);
        assert_eq!(actions, ["a0", "a1", "a2"]);
    }

    #[test]
    fn test_named() {
        let (game, actions) = super::from_reader(
            r#"{ "actions": ["rock", "paper", "scissors"], "matrix": [[0, -1, 1], [1, 0, -1], [-1, 1, 0]] }"#
                .as_bytes(),
        );
        assert_eq!(game.num_actions(), 3);
        assert_eq!(actions, ["rock", "paper", "scissors"]);
    }

    #[test]
    fn test_anonymous() {
        let (_, actions) =
            super::from_reader(r#"{ "matrix": [[0, -1], [1, 0]] }"#.as_bytes());
        assert_eq!(actions, ["a0", "a1"]);
    }

    #[test]
    #[should_panic(expected = "couldn't parse json game definition")]
    fn test_json_error() {
        super::from_reader(r#"[[0.0, "paper"]]"#.as_bytes());
    }

    #[test]
    #[should_panic(expected = "couldn't interpret payoffs as a playable game")]
    fn test_game_error() {
        super::from_reader(r#"[[0.0, 1.0], [1.0, 0.0]]"#.as_bytes());
    }

    #[test]
    #[should_panic(expected = "found 2 action names for a game with 3 actions")]
    fn test_name_mismatch() {
        super::from_reader(
            r#"{ "actions": ["rock", "paper"], "matrix": [[0, -1, 1], [1, 0, -1], [-1, 1, 0]] }"#
                .as_bytes(),
        );
    }
}
