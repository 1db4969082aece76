//! Human-played rounds at the terminal.

use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use wagerlab_core::{CardSource, Direction, GameRules, Granularity, Guess, Rank, Suit};
use wagerlab_sim::{
    format_percent, ratio, write_json, PoolTracking, Round, RoundOutcome, RoundPhase, SimError,
};

const RULE_WIDTH: usize = 70;

/// Set once SIGINT arrives or Ctrl+C is read in raw mode.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(unix)]
extern "C" fn on_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Turns SIGINT into a flag so the session can summarise and save. Installed
/// without `SA_RESTART`, so a blocked read returns `Interrupted`.
#[cfg(unix)]
pub fn install_interrupt_handler() -> io::Result<()> {
    let mut action = unsafe { std::mem::zeroed::<libc::sigaction>() };
    action.sa_sigaction = on_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t;
    action.sa_flags = 0;
    if unsafe { libc::sigemptyset(&mut action.sa_mask) } != 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() -> io::Result<()> {
    Ok(())
}

/// One line of player input, already interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Call(Guess),
    Continue,
    CashOut,
    Quit,
}

/// Parses a call such as `h`, `lower`, or `t d` for suited games.
pub fn parse_call(line: &str, granularity: Granularity) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    if matches!(line.as_str(), "q" | "quit" | "exit") {
        return Some(Command::Quit);
    }
    let mut words = line.split_whitespace();
    let direction = Direction::from_keyword(words.next()?)?;
    let suit = match words.next() {
        Some(word) => Some(suit_keyword(word)?),
        None => None,
    };
    if words.next().is_some() {
        return None;
    }
    match (granularity, suit) {
        (Granularity::Direction, None) => Some(Command::Call(Guess::direction(direction))),
        (Granularity::DirectionAndSuit, Some(suit)) => {
            Some(Command::Call(Guess::suited(direction, suit)))
        }
        _ => None,
    }
}

/// Parses the answer to "ride or cash out" after a won stage.
pub fn parse_ride(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "c" | "continue" | "ride" | "y" | "yes" => Some(Command::Continue),
        "s" | "stop" | "cash" | "n" | "no" => Some(Command::CashOut),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn suit_keyword(word: &str) -> Option<Suit> {
    match word {
        "s" | "spades" | "♠" => Some(Suit::Spades),
        "h" | "hearts" | "♥" => Some(Suit::Hearts),
        "c" | "clubs" | "♣" => Some(Suit::Clubs),
        "d" | "diamonds" | "♦" => Some(Suit::Diamonds),
        _ => None,
    }
}

/// Where session lines come from. `None` ends the session.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// True once the player asked to stop outside of a line read.
    fn interrupted(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionRound {
    pub round: u64,
    pub cards: Vec<String>,
    pub first_value: u8,
    pub calls: Vec<String>,
    pub outcomes: Vec<Direction>,
    pub stages_played: usize,
    pub payout: u32,
    pub cost: u32,
    pub net_result: i64,
    pub balance_after: i64,
    pub win: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionDocument {
    pub game: String,
    pub game_id: String,
    pub session_timestamp: u64,
    pub seed: u64,
    pub total_rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: String,
    pub total_payout: u64,
    pub total_cost: u64,
    pub final_balance: i64,
    pub game_history: Vec<SessionRound>,
}

pub struct Session {
    rules: GameRules,
    source: CardSource,
    seed: u64,
    history: Vec<SessionRound>,
    balance: i64,
}

enum Step {
    Played(RoundOutcome),
    Abandoned,
}

impl Session {
    pub fn new(rules: GameRules, seed: u64) -> Self {
        Self {
            rules,
            source: CardSource::new(seed),
            seed,
            history: Vec::new(),
            balance: 0,
        }
    }

    #[cfg(test)]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    #[cfg(test)]
    pub fn history(&self) -> &[SessionRound] {
        &self.history
    }

    /// Plays rounds until the input ends, the player quits or an interrupt lands.
    pub fn run(
        &mut self,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<(), SimError> {
        self.write_header(out)?;
        while !input.interrupted() {
            match self.play_round(input, out)? {
                (Step::Played(outcome), quit) => {
                    self.record(&outcome);
                    self.write_round(out)?;
                    if quit {
                        break;
                    }
                }
                (Step::Abandoned, _) => break,
            }
        }
        if input.interrupted() {
            writeln!(out, "\nGame interrupted by user.")?;
        }
        self.write_summary(out)?;
        Ok(())
    }

    fn play_round(
        &mut self,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> Result<(Step, bool), SimError> {
        let rules = &self.rules;
        let source = &mut self.source;
        let mut round = Round::deal(rules, source, PoolTracking::Round);
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            "First card drawn: {} (value: {})",
            round.reference(),
            round.reference().value()
        )?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        loop {
            let guess = match read_call(input, out, rules.granularity)? {
                Some(guess) => guess,
                None if round.stage() == 0 => return Ok((Step::Abandoned, true)),
                None => return Ok((Step::Played(round.settle()?), true)),
            };
            let result = round.resolve(guess, source)?;
            writeln!(
                out,
                "Stage {}: drew {} ({}), {}",
                result.stage + 1,
                result.drawn,
                result.outcome.name().to_uppercase(),
                if result.won { "hit" } else { "miss" }
            )?;
            if round.phase() != RoundPhase::StageWon {
                return Ok((Step::Played(round.settle()?), false));
            }
            writeln!(out, "Banked ${} so far.", round.banked())?;
            match read_ride(input, out)? {
                Some(Command::Continue) => {
                    let reference = round.advance()?;
                    writeln!(
                        out,
                        "Next reference: {reference} (value: {})",
                        reference.value()
                    )?;
                }
                Some(Command::Quit) | None => {
                    return Ok((Step::Played(round.settle()?), true));
                }
                _ => return Ok((Step::Played(round.settle()?), false)),
            }
        }
    }

    fn record(&mut self, outcome: &RoundOutcome) {
        self.balance += outcome.net_result;
        let first_value = outcome.first_card().map(|card| card.value()).unwrap_or(0);
        self.history.push(SessionRound {
            round: self.history.len() as u64 + 1,
            cards: outcome.cards_drawn.iter().map(|card| card.to_string()).collect(),
            first_value,
            calls: outcome.stages.iter().map(|stage| stage.guess.label()).collect(),
            outcomes: outcome.stages.iter().map(|stage| stage.outcome).collect(),
            stages_played: outcome.stages_played(),
            payout: outcome.total_payout,
            cost: outcome.total_wagered,
            net_result: outcome.net_result,
            balance_after: self.balance,
            win: outcome.won,
        });
    }

    fn write_header(&self, out: &mut dyn Write) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "\n{rule}")?;
        writeln!(out, "{}", self.rules.display_name.to_uppercase())?;
        writeln!(out, "{rule}")?;
        for (index, stage) in self.rules.stages.iter().enumerate() {
            writeln!(out, "Stage {} cost: ${}", index + 1, stage.cost)?;
            let table: Vec<String> = Rank::ALL
                .iter()
                .map(|rank| {
                    format!(
                        "{}:${}",
                        rank.label(),
                        stage.payouts.payout(*rank, Direction::Higher)
                    )
                })
                .collect();
            writeln!(out, "  Higher/Lower: {}", table.join(" "))?;
            writeln!(out, "  Tie: ${}", stage.payouts.tie)?;
        }
        writeln!(out, "{rule}")?;
        writeln!(out, "Enter q or press Ctrl+C at any time to exit and save your results.")?;
        writeln!(out, "{rule}")
    }

    fn write_round(&self, out: &mut dyn Write) -> io::Result<()> {
        let Some(last) = self.history.last() else {
            return Ok(());
        };
        writeln!(out, "\n--- Round {} ---", last.round)?;
        writeln!(out, "Cards: {}", last.cards.join(" "))?;
        writeln!(out, "Your calls: {}", last.calls.join(", "))?;
        if last.win {
            writeln!(out, "YOU WIN! Payout: ${}", last.payout)?;
        } else {
            writeln!(out, "You lose. Payout: $0")?;
        }
        writeln!(out, "Cost: ${}", last.cost)?;
        writeln!(out, "Net result: ${:+}", last.net_result)?;
        writeln!(out, "Balance: ${:+}", last.balance_after)
    }

    fn write_summary(&self, out: &mut dyn Write) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "\n{rule}")?;
        writeln!(out, "FINAL SUMMARY")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "Total rounds played: {}", self.history.len())?;
        if !self.history.is_empty() {
            let document = self.document(0);
            writeln!(out, "Wins: {}", document.wins)?;
            writeln!(out, "Losses: {}", document.losses)?;
            writeln!(out, "Win rate: {}", document.win_rate)?;
            writeln!(out, "Final balance: ${:+}", self.balance)?;
        }
        writeln!(out, "{rule}")
    }

    pub fn document(&self, timestamp: u64) -> SessionDocument {
        let rounds = self.history.len() as u64;
        let wins = self.history.iter().filter(|round| round.win).count() as u64;
        SessionDocument {
            game: self.rules.display_name.clone(),
            game_id: self.rules.id.clone(),
            session_timestamp: timestamp,
            seed: self.seed,
            total_rounds: rounds,
            wins,
            losses: rounds - wins,
            win_rate: format_percent(ratio(wins, rounds).map(|rate| rate * 100.0)),
            total_payout: self.history.iter().map(|round| u64::from(round.payout)).sum(),
            total_cost: self.history.iter().map(|round| u64::from(round.cost)).sum(),
            final_balance: self.balance,
            game_history: self.history.clone(),
        }
    }

    /// Writes the session document into `dir`. Nothing is written for an empty session.
    pub fn save(&self, dir: &Path) -> Result<Option<PathBuf>, SimError> {
        if self.history.is_empty() {
            return Ok(None);
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        let path = dir.join(format!("high_low_challenge_game_{timestamp}.json"));
        write_json(&path, &self.document(timestamp))?;
        Ok(Some(path))
    }
}

fn read_call(
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    granularity: Granularity,
) -> io::Result<Option<Guess>> {
    let prompt = match granularity {
        Granularity::Direction => "Will the next card be (h)igher, (l)ower, or (t)ie? ",
        Granularity::DirectionAndSuit => {
            "Call direction and suit, e.g. `h s` (h/l/t then s/h/c/d): "
        }
    };
    let retry = match granularity {
        Granularity::Direction => "Invalid choice. Please enter 'h', 'l', or 't'.",
        Granularity::DirectionAndSuit => {
            "Invalid choice. Please enter 'h', 'l', or 't' followed by 's', 'h', 'c', or 'd'."
        }
    };
    loop {
        out.flush()?;
        let Some(line) = input.read_line(prompt) else {
            return Ok(None);
        };
        match parse_call(&line, granularity) {
            Some(Command::Call(guess)) => return Ok(Some(guess)),
            Some(Command::Quit) => return Ok(None),
            _ => writeln!(out, "{retry}")?,
        }
    }
}

fn read_ride(input: &mut dyn LineSource, out: &mut dyn Write) -> io::Result<Option<Command>> {
    loop {
        out.flush()?;
        let Some(line) = input.read_line("(c)ontinue to the next stage or (s)top and collect? ")
        else {
            return Ok(None);
        };
        match parse_ride(&line) {
            Some(command) => return Ok(Some(command)),
            None => writeln!(out, "Invalid choice. Please enter 'c' or 's'.")?,
        }
    }
}

/// Reads from stdin. On a tty the line is read in raw mode so Ctrl+C arrives as
/// a byte; elsewhere the SIGINT handler cuts the read short.
#[derive(Debug, Default)]
pub struct Terminal;

impl LineSource for Terminal {
    #[cfg(unix)]
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        use std::os::fd::AsRawFd;
        if interrupted() {
            return None;
        }
        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        if unsafe { libc::isatty(fd) } != 1 {
            return read_line_basic(prompt);
        }
        let _raw = match RawMode::new(fd) {
            Ok(raw) => raw,
            Err(_) => return read_line_basic(prompt),
        };
        let mut input = stdin.lock();
        let mut buffer = Vec::new();
        redraw(prompt, &buffer);
        loop {
            let byte = next_byte(&mut input)?;
            match byte {
                b'\n' | b'\r' => {
                    print!("\r\n");
                    return Some(decode(buffer));
                }
                3 => {
                    INTERRUPTED.store(true, Ordering::SeqCst);
                    print!("\r\n");
                    return None;
                }
                4 if buffer.is_empty() => {
                    print!("\r\n");
                    return None;
                }
                127 | 8 => pop_char(&mut buffer),
                byte if byte.is_ascii_control() => {}
                byte => buffer.push(byte),
            }
            redraw(prompt, &buffer);
        }
    }

    #[cfg(not(unix))]
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if interrupted() {
            return None;
        }
        read_line_basic(prompt)
    }

    fn interrupted(&self) -> bool {
        interrupted()
    }
}

/// Next input byte; `None` on EOF, a read error or an interrupt.
fn next_byte(input: &mut impl Read) -> Option<u8> {
    let mut byte = [0u8; 1];
    loop {
        if interrupted() {
            return None;
        }
        match input.read(&mut byte) {
            Ok(0) => return None,
            Ok(_) => return Some(byte[0]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return None,
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes)
        .trim_end_matches(&['\n', '\r'][..])
        .to_string()
}

/// Drops the last UTF-8 character, continuation bytes included.
fn pop_char(buffer: &mut Vec<u8>) {
    while let Some(byte) = buffer.pop() {
        if byte & 0b1100_0000 != 0b1000_0000 {
            break;
        }
    }
}

fn redraw(prompt: &str, buffer: &[u8]) {
    print!("\r\x1b[2K{prompt}{}", String::from_utf8_lossy(buffer));
    let _ = io::stdout().flush();
}

fn read_line_basic(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut buffer = Vec::new();
    loop {
        match next_byte(&mut input) {
            Some(b'\n') => return Some(decode(buffer)),
            Some(byte) => buffer.push(byte),
            None if buffer.is_empty() || interrupted() => return None,
            None => return Some(decode(buffer)),
        }
    }
}

#[cfg(unix)]
struct RawMode {
    fd: i32,
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    fn new(fd: i32) -> io::Result<Self> {
        let mut original = unsafe { std::mem::zeroed::<libc::termios>() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        raw.c_iflag &= !(libc::IXON | libc::ICRNL);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.original) };
    }
}
