use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use realm_core::model::{Challenge, ObstacleType, WordRecord};
use realm_core::progression::{Effects, Outcome, ProgressionConfig, Status};
use services::challenge::{ClueSource, GuardianSource, Land, TileSource};
use services::modes::{
    ClashMatch, Direction, ForestRun, Forge, ForgeCheck, GRID_SIZE, MatchKind, Position, QuestLand,
};
use services::{AttemptResult, ChallengeSource, GameSession, GameSummary};

use crate::{PlayMode, PlayOptions};

/// Score a quest land must reach before the next one opens.
const QUEST_UNLOCK_SCORE: u32 = 30;

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

pub fn run(options: &PlayOptions) -> Result<(), Box<dyn Error>> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let records = match &options.words {
        Some(path) => load_records(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        mode = ?options.mode,
        records = records.len(),
        seed = ?options.seed,
        "starting game"
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    match options.mode {
        PlayMode::Wordsmith => {
            let tiles = TileSource::new(StdRng::from_rng(&mut rng)).with_records(records);
            wordsmith(GameSession::new(ProgressionConfig::wordsmith(), tiles), &mut lines)
        }
        PlayMode::Forest => {
            let clues = ClueSource::new(StdRng::from_rng(&mut rng)).with_records(records);
            forest(
                GameSession::new(ProgressionConfig::forest(), clues),
                ForestRun::new(rng),
                &mut lines,
            )
        }
        PlayMode::Tower => {
            let guardians = GuardianSource::new(rng).with_records(records);
            tower(GameSession::new(ProgressionConfig::tower(), guardians), &mut lines)
        }
        PlayMode::Clash => {
            let guardians = GuardianSource::new(rng).with_records(records);
            let game = ClashMatch::new(MatchKind::OneVsOne, &["Player 1", "Player 2"], guardians)?;
            clash(game, &mut lines)
        }
        PlayMode::Quest => quest(options.land, rng, &mut lines),
    }
}

fn load_records(path: &std::path::Path) -> Result<Vec<WordRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    let records: Vec<WordRecord> = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// Print `text` and read one trimmed line. `None` on end of input or `q`.
fn prompt(lines: &mut Lines<'_>, text: &str) -> io::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let Some(line) = lines.next().transpose()? else {
        return Ok(None);
    };
    let line = line.trim().to_string();
    if line.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    Ok(Some(line))
}

/// A number picks an option; anything else is answered as typed.
fn choose_answer(challenge: &Challenge, input: &str) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| challenge.option(n))
        .unwrap_or(input)
        .to_string()
}

fn show_challenge(challenge: &Challenge) {
    println!();
    println!("== {} ==", challenge.title);
    println!("{}", challenge.prompt);
    for (i, option) in challenge.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    for hint in &challenge.hints {
        println!("  hint: {hint}");
    }
}

fn report(result: &AttemptResult) {
    match result.outcome {
        Outcome::Correct => println!("Correct! +{} points", result.effects.points_awarded),
        Outcome::Incorrect => println!("Not quite. The answer was {}.", result.correct_answer),
    }
    report_effects(&result.effects);
}

fn report_effects(effects: &Effects) {
    if effects.leveled_up {
        println!("Level up!");
    }
    if effects.floor_reset {
        println!("You fall back to the first floor.");
    }
    if effects.lives_lost && !effects.lost {
        println!("You lose a life.");
    }
    if effects.expired {
        println!("Time's up!");
    }
}

fn show_summary(summary: &GameSummary) {
    let verdict = match summary.status {
        Status::Won => "You win!",
        Status::Lost => "Game over.",
        Status::Active => "Game left unfinished.",
    };
    println!();
    println!("{verdict}");
    println!(
        "Score {}  level {} (best {})  {}/{} correct",
        summary.score, summary.level, summary.highest_level, summary.correct, summary.attempts
    );
}

fn status_line<S: ChallengeSource>(session: &GameSession<S>) -> String {
    let state = session.state();
    let mut line = format!(
        "Score {}  Level {}  Combo {}",
        state.score(),
        state.level(),
        state.combo()
    );
    if let Some(lives) = state.lives() {
        line.push_str(&format!("  Lives {lives}"));
    }
    if let Some(countdown) = session.countdown() {
        line.push_str(&format!("  Time {}s", countdown.seconds_left()));
    }
    line
}

// ─── Wordsmith ─────────────────────────────────────────────────────────────

fn wordsmith(
    mut session: GameSession<TileSource<StdRng>>,
    lines: &mut Lines<'_>,
) -> Result<(), Box<dyn Error>> {
    let mut forge = Forge::new();
    let mut last = Instant::now();
    println!("Pick rack tiles by number; `b <n>` returns a cauldron tile; `q` quits.");

    while !session.is_over() {
        if let Some(challenge) = session.challenge() {
            forge.deal(challenge);
            println!();
            println!("{}: {}", challenge.title, challenge.prompt);
        }
        println!("{}", status_line(&session));
        println!("Cauldron: [{}]", forge.cauldron().join(" + "));
        for (i, tile) in forge.rack().iter().enumerate() {
            print!(" {}:{tile}", i + 1);
        }
        println!();

        let Some(input) = prompt(lines, "> ")? else {
            break;
        };
        if let Some(effects) = session.tick(last.elapsed()) {
            report_effects(&effects);
        }
        last = Instant::now();
        if session.is_over() {
            break;
        }

        if let Some(rest) = input.strip_prefix("b ") {
            let returned = rest
                .trim()
                .parse::<usize>()
                .is_ok_and(|n| n > 0 && forge.take_back(n - 1));
            if !returned {
                println!("No such cauldron tile.");
            }
            continue;
        }
        let Some(index) = input.parse::<usize>().ok().filter(|n| *n > 0) else {
            println!("Enter a tile number.");
            continue;
        };
        let Some(check) = forge.add(index - 1, session.source()) else {
            println!("No such tile.");
            continue;
        };
        match &check {
            ForgeCheck::Accepted(word) => println!("You forged {word}!"),
            ForgeCheck::Rejected(word) => println!("{word} is not a word."),
            ForgeCheck::Pending => {}
        }
        if let Some(outcome) = check.outcome() {
            let effects = session.record(outcome);
            if effects.points_awarded > 0 {
                println!("+{} points", effects.points_awarded);
            }
            report_effects(&effects);
        }
    }

    show_summary(&session.summary());
    Ok(())
}

// ─── Forest ────────────────────────────────────────────────────────────────

fn forest(
    mut session: GameSession<ClueSource<StdRng>>,
    mut run: ForestRun<StdRng>,
    lines: &mut Lines<'_>,
) -> Result<(), Box<dyn Error>> {
    println!("Move with w/a/s/d; reach the clue (?) to answer it; `q` quits.");

    while !session.is_over() {
        draw_grid(&run);
        println!("{}", status_line(&session));
        let Some(input) = prompt(lines, "move> ")? else {
            break;
        };
        let direction = match input.to_ascii_lowercase().as_str() {
            "w" => Direction::Up,
            "s" => Direction::Down,
            "a" => Direction::Left,
            "d" => Direction::Right,
            _ => {
                println!("Use w, a, s or d.");
                continue;
            }
        };
        let Some(step) = run.step(direction) else {
            println!("The forest ends there.");
            continue;
        };
        if step.pushed_back {
            println!("A tree blocks the way.");
        }
        match step.obstacle {
            Some(ObstacleType::Tree) | None => {}
            Some(ObstacleType::Trap) => println!("You stumble into a trap!"),
            Some(ObstacleType::Monster) => println!("A monster attacks!"),
            Some(ObstacleType::Powerup) => println!("You found a powerup!"),
        }
        if let Some(event) = step.event {
            report_effects(&session.apply_event(event));
        }
        if !step.at_clue || session.is_over() {
            continue;
        }

        let Some(challenge) = session.challenge().cloned() else {
            continue;
        };
        show_challenge(&challenge);
        let Some(input) = prompt(lines, "answer> ")? else {
            break;
        };
        let Some(result) = session.answer(&choose_answer(&challenge, &input)) else {
            continue;
        };
        report(&result);
        if result.outcome == Outcome::Correct {
            if let Some(spawned) = run.clue_solved() {
                println!("Something stirs in the forest: a {} appears.", spawned.kind);
            }
        }
    }

    show_summary(&session.summary());
    Ok(())
}

fn draw_grid<R>(run: &ForestRun<R>)
where
    R: rand::Rng,
{
    println!();
    for y in 0..GRID_SIZE {
        let row: String = (0..GRID_SIZE)
            .map(|x| {
                let cell = Position::new(x, y);
                if cell == run.player() {
                    '@'
                } else if cell == run.clue() {
                    '?'
                } else {
                    match run.obstacle_at(cell) {
                        Some(ObstacleType::Tree) => 'T',
                        Some(ObstacleType::Trap) => 'x',
                        Some(ObstacleType::Powerup) => '+',
                        Some(ObstacleType::Monster) => 'M',
                        None => '.',
                    }
                }
            })
            .flat_map(|c| [c, ' '])
            .collect();
        println!("  {}", row.trim_end());
    }
}

// ─── Tower ─────────────────────────────────────────────────────────────────

fn tower(
    mut session: GameSession<GuardianSource<StdRng>>,
    lines: &mut Lines<'_>,
) -> Result<(), Box<dyn Error>> {
    println!("Answer by option number; `q` quits.");

    while !session.is_over() {
        let Some(challenge) = session.challenge().cloned() else {
            break;
        };
        show_challenge(&challenge);
        println!("{}", status_line(&session));
        let Some(input) = prompt(lines, "answer> ")? else {
            break;
        };
        if let Some(result) = session.answer(&choose_answer(&challenge, &input)) {
            report(&result);
        }
    }

    show_summary(&session.summary());
    Ok(())
}

// ─── Clash ─────────────────────────────────────────────────────────────────

fn clash(
    mut game: ClashMatch<GuardianSource<StdRng>>,
    lines: &mut Lines<'_>,
) -> Result<(), Box<dyn Error>> {
    println!("Hot seat: type `<player> <option>`, e.g. `1 3`; `q` quits.");
    let mut last = Instant::now();

    while !game.is_over() {
        let Some(challenge) = game.challenge().cloned() else {
            break;
        };
        show_challenge(&challenge);
        let scores: Vec<String> = game
            .players()
            .iter()
            .map(|p| format!("{} {} (streak {})", p.name, p.score(), p.streak()))
            .collect();
        println!("{}  Time {}s", scores.join("  "), game.countdown().seconds_left());

        let Some(input) = prompt(lines, "> ")? else {
            break;
        };
        if game.tick(last.elapsed()) {
            println!("Time's up!");
            break;
        }
        last = Instant::now();

        let Some((player, answer)) = input.split_once(' ') else {
            println!("Type the player number, a space and the answer.");
            continue;
        };
        let Some(player) = player
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=game.players().len()).contains(n))
        else {
            println!("No such player.");
            continue;
        };
        let answer = choose_answer(&challenge, answer.trim());
        if let Some(result) = game.answer(player - 1, &answer) {
            report(&result);
        }
    }

    println!();
    match game.leader() {
        Some(leader) => println!("{} wins with {} points!", leader.name, leader.score()),
        None => println!("It's a tie."),
    }
    Ok(())
}

// ─── Quest ─────────────────────────────────────────────────────────────────

fn quest(start: Land, mut rng: StdRng, lines: &mut Lines<'_>) -> Result<(), Box<dyn Error>> {
    let mut lands: Vec<QuestLand<StdRng>> = Land::ALL
        .iter()
        .map(|land| QuestLand::new(*land, StdRng::from_rng(&mut rng)))
        .collect();
    let Some(mut current) = lands.iter().position(|l| l.land() == start) else {
        return Ok(());
    };
    if !lands[current].is_unlocked() {
        println!("{} is locked. Start in {}.", start.name(), Land::Science.name());
        return Ok(());
    }
    println!("Unscramble the words; `q` quits.");

    loop {
        let land = &mut lands[current];
        let Some(challenge) = land.challenge().cloned() else {
            break;
        };
        println!();
        println!("{} ({})  Score {}", land.land().name(), land.land().theme(), land.score());
        println!("{}", challenge.prompt);
        for hint in &challenge.hints {
            println!("  hint: {hint}");
        }
        let Some(input) = prompt(lines, "answer> ")? else {
            break;
        };
        if let Some(result) = land.answer(&input) {
            report(&result);
        }

        if land.score() >= QUEST_UNLOCK_SCORE {
            let Some(next) = lands.get_mut(current + 1) else {
                println!("Every land is cleared!");
                break;
            };
            if !next.is_unlocked() {
                next.unlock();
                tracing::info!(land = next.land().name(), "quest land unlocked");
                println!("{} is now open!", next.land().name());
                current += 1;
            }
        }
    }

    let total: u32 = lands.iter().map(QuestLand::score).sum();
    println!();
    println!("Quest score {total}");
    Ok(())
}
