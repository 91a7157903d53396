use solana_program::clock::UnixTimestamp;

use crate::state::RaffleStatus;

/// Outcome of each readiness condition, kept separate so the caller can log
/// which one held the draw back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

impl UpkeepCheck {
    pub fn is_ready(&self) -> bool {
        self.is_open && self.time_passed && self.has_balance && self.has_players
    }
}

/// Evaluate every readiness condition without touching any state.
pub fn evaluate(
    now: UnixTimestamp,
    start_timestamp: UnixTimestamp,
    interval: u64,
    status: RaffleStatus,
    pot: u64,
    player_count: usize,
) -> UpkeepCheck {
    // A clock behind the round start counts as no time elapsed.
    let elapsed = now.saturating_sub(start_timestamp);
    let time_passed = elapsed >= 0 && elapsed as u64 >= interval;

    UpkeepCheck {
        is_open: status == RaffleStatus::Open,
        time_passed,
        has_balance: pot > 0,
        has_players: player_count > 0,
    }
}

pub fn is_ready(
    now: UnixTimestamp,
    start_timestamp: UnixTimestamp,
    interval: u64,
    status: RaffleStatus,
    pot: u64,
    player_count: usize,
) -> bool {
    evaluate(now, start_timestamp, interval, status, pot, player_count).is_ready()
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: UnixTimestamp = 1_700_000_000;
    const INTERVAL: u64 = 30;

    #[test]
    fn ready_when_all_conditions_hold() {
        let now = START + INTERVAL as i64 + 1;
        assert!(is_ready(now, START, INTERVAL, RaffleStatus::Open, 10, 1));
    }

    #[test]
    fn ready_exactly_at_interval() {
        let now = START + INTERVAL as i64;
        assert!(is_ready(now, START, INTERVAL, RaffleStatus::Open, 10, 1));
    }

    #[test]
    fn empty_pot_is_never_ready() {
        let now = START + INTERVAL as i64 + 1;
        let check = evaluate(now, START, INTERVAL, RaffleStatus::Open, 0, 1);

        assert!(!check.is_ready());
        assert!(check.time_passed);
        assert!(!check.has_balance);
    }

    #[test]
    fn early_poll_is_not_ready() {
        let now = START + INTERVAL as i64 - 1;
        let check = evaluate(now, START, INTERVAL, RaffleStatus::Open, 10, 1);

        assert!(!check.is_ready());
        assert!(!check.time_passed);
        assert!(check.has_balance);
    }

    #[test]
    fn calculating_is_not_ready() {
        let now = START + INTERVAL as i64 + 1;
        assert!(!is_ready(now, START, INTERVAL, RaffleStatus::Calculating, 10, 1));
    }

    #[test]
    fn no_players_is_not_ready() {
        let now = START + INTERVAL as i64 + 1;
        assert!(!is_ready(now, START, INTERVAL, RaffleStatus::Open, 10, 0));
    }

    #[test]
    fn clock_behind_start_is_not_ready() {
        assert!(!is_ready(START - 5, START, 0, RaffleStatus::Open, 10, 1));
    }

    #[test]
    fn zero_interval_is_ready_immediately() {
        assert!(is_ready(START, START, 0, RaffleStatus::Open, 10, 1));
    }
}
