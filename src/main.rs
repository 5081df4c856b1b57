mod json;

use clap::{Parser, ValueEnum};
use indexmap::IndexMap;
use matrix_cfr::{MatrixGame, PlayerNum, Record, SelfPlay, Strategy};
use serde::Serialize;
use std::fs::File;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameSpec {
    Json,
    Rps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Freeze {
    One,
    Two,
}

/// Regret matching equilibrium solver for two-player zero-sum matrix games
///
/// This program reads a symmetric two-player zero-sum game as a payoff matrix and runs regret
/// matching self play to find an approximate nash equilibrium. The result will be a json object
/// like:
///
/// `{ "iterations": <number>, "expected_one_payoff": <number>, "player_one_exploitability":
/// <number>, "player_two_exploitability": <number>, "player_one_regret": [<number>],
/// "player_two_regret": [<number>], "player_one_average": <strat>, "player_two_average": <strat>,
/// "player_one_strategy": <strat>, "player_two_strategy": <strat> }`
///
/// where strats are mappings from action names to probabilities. Zero probability actions will be
/// omitted. The averages are the equilibrium estimates; the strategies are the raw regret matched
/// play of the last iteration. With `--trace` the object also contains `player_one_trace` and
/// `player_two_trace`, the running averages after every iteration.
///
/// For more information see: https://github.com/erikbrinkman/matrix-cfr
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Game to solve
    ///
    /// Rps : the built-in three action rock paper scissors game. `input` is ignored.
    ///
    /// Json : reads a payoff matrix as json from `input`. The game is either a bare matrix
    /// `[[...], ...]` or an object `{ "actions": [<string>], "matrix": [[...], ...] }` where
    /// action names default to "a0" through "aN-1". The matrix holds the first player's payoff for
    /// every pair of hero and villain actions and must be square with `matrix[i][j] ==
    /// -matrix[j][i]`.
    #[clap(short, long, value_enum, default_value_t = GameSpec::Json)]
    game: GameSpec,

    /// Stop after `iters` iterations of self play
    #[clap(short = 't', long, value_parser, default_value_t = 1000)]
    iters: u64,

    /// Starting strategy for player one
    ///
    /// One of `uniform`, `pure:<action index>`, or a comma separated list of probabilities like
    /// `0.2,0.5,0.3`. Lists are renormalized, but must already sum to one within a small
    /// tolerance.
    #[clap(long, value_parser, default_value = "uniform")]
    init_one: String,

    /// Starting strategy for player two
    ///
    /// Takes the same forms as `init_one`.
    #[clap(long, value_parser, default_value = "uniform")]
    init_two: String,

    /// Freeze one player at its starting strategy
    ///
    /// The frozen player never updates, so the other player's average converges to a best
    /// response against the frozen strategy instead of an equilibrium.
    #[clap(short, long, value_enum)]
    freeze: Option<Freeze>,

    /// Include the running averaged trace of both players in the output
    #[clap(long)]
    trace: bool,

    /// Read the game from a file instead of from stdin
    #[clap(short, long, value_parser, default_value = "-")]
    input: String,

    /// Write results to a file instead of stdout
    #[clap(short, long, value_parser, default_value = "-")]
    output: String,
}

#[derive(Serialize)]
struct NamedStrategy(IndexMap<String, f64>);

impl NamedStrategy {
    fn new(actions: &[String], strat: &Strategy) -> Self {
        NamedStrategy(
            actions
                .iter()
                .cloned()
                .zip(strat.iter().copied())
                .filter(|(_, prob)| prob > &0.0)
                .collect(),
        )
    }
}

#[derive(Serialize)]
struct Output {
    iterations: u64,
    expected_one_payoff: f64,
    player_one_exploitability: f64,
    player_two_exploitability: f64,
    player_one_regret: Vec<f64>,
    player_two_regret: Vec<f64>,
    player_one_average: NamedStrategy,
    player_two_average: NamedStrategy,
    player_one_strategy: NamedStrategy,
    player_two_strategy: NamedStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    player_one_trace: Option<Vec<NamedStrategy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    player_two_trace: Option<Vec<NamedStrategy>>,
}

fn parse_init(raw: &str, num_actions: usize) -> Strategy {
    if raw == "uniform" {
        Strategy::uniform(num_actions)
    } else if let Some(action) = raw.strip_prefix("pure:") {
        let action = action.parse().expect(
            "couldn't parse the action index of a pure starting strategy : https://github.com/erikbrinkman/matrix-cfr#init-error",
        );
        assert!(
            action < num_actions,
            "pure action index {} out of range for a game with {} actions : https://github.com/erikbrinkman/matrix-cfr#init-error",
            action,
            num_actions,
        );
        Strategy::pure(num_actions, action)
    } else {
        let probs: Vec<f64> = raw
            .split(',')
            .map(|tok| {
                tok.trim().parse().expect(
                    "couldn't parse a probability of a starting strategy : https://github.com/erikbrinkman/matrix-cfr#init-error",
                )
            })
            .collect();
        Strategy::new(probs).expect(
            "couldn't interpret probabilities as a starting strategy : https://github.com/erikbrinkman/matrix-cfr#init-error",
        )
    }
}

fn traced(play: &SelfPlay, actions: &[String], num: PlayerNum) -> Vec<NamedStrategy> {
    play.averages(num)
        .iter()
        .map(|strat| NamedStrategy::new(actions, strat))
        .collect()
}

fn main() {
    let args = Args::parse();
    let (game, actions) = match args.game {
        GameSpec::Rps => (
            MatrixGame::rps(),
            ["rock", "paper", "scissors"].map(String::from).into(),
        ),
        GameSpec::Json if args.input == "-" => json::from_reader(io::stdin()),
        GameSpec::Json => json::from_reader(File::open(args.input).unwrap()),
    };
    let one = parse_init(&args.init_one, game.num_actions());
    let two = parse_init(&args.init_two, game.num_actions());
    let record = if args.trace {
        Record::Both
    } else {
        Record::Neither
    };
    let frozen = args.freeze.map(|frozen| match frozen {
        Freeze::One => PlayerNum::One,
        Freeze::Two => PlayerNum::Two,
    });
    let mut play = match frozen {
        Some(frozen) => SelfPlay::with_frozen(&game, one, two, record, frozen),
        None => SelfPlay::new(&game, one, two, record),
    }
    .expect(
        "starting strategies need one probability per game action : https://github.com/erikbrinkman/matrix-cfr#init-error",
    );
    play.run(args.iters);
    let one_avg = play.average(PlayerNum::One);
    let two_avg = play.average(PlayerNum::Two);
    let out = Output {
        iterations: play.iteration(),
        expected_one_payoff: game.expected_payoff(&one_avg, &two_avg),
        player_one_exploitability: game.exploitability(&one_avg),
        player_two_exploitability: game.exploitability(&two_avg),
        player_one_regret: play.cum_regret(PlayerNum::One).to_vec(),
        player_two_regret: play.cum_regret(PlayerNum::Two).to_vec(),
        player_one_average: NamedStrategy::new(&actions, &one_avg),
        player_two_average: NamedStrategy::new(&actions, &two_avg),
        player_one_strategy: NamedStrategy::new(&actions, &play.strategy(PlayerNum::One)),
        player_two_strategy: NamedStrategy::new(&actions, &play.strategy(PlayerNum::Two)),
        player_one_trace: args.trace.then(|| traced(&play, &actions, PlayerNum::One)),
        player_two_trace: args.trace.then(|| traced(&play, &actions, PlayerNum::Two)),
    };
    if args.output == "-" {
        serde_json::to_writer(io::stdout(), &out).unwrap();
    } else {
        serde_json::to_writer(File::create(args.output).unwrap(), &out).unwrap();
    };
}
