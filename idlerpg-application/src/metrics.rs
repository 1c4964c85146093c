use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ticks: AtomicU64,
    tick_errors: AtomicU64,
    players_advanced: AtomicU64,
    level_ups: AtomicU64,
    events_received: AtomicU64,
    events_dropped: AtomicU64,
    penalties: AtomicU64,
    commands: AtomicU64,
}

impl Metrics {
    pub fn record_tick(&self, players: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.players_advanced
            .fetch_add(players as u64, Ordering::Relaxed);
    }

    pub fn record_tick_error(&self) {
        self.tick_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_level_ups(&self, count: usize) {
        self.level_ups.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_penalty(&self) {
        self.penalties.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_command(&self) {
        self.commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn level_ups(&self) -> u64 {
        self.level_ups.load(Ordering::Relaxed)
    }

    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    pub fn penalties(&self) -> u64 {
        self.penalties.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let ticks = self.ticks.load(Ordering::Relaxed);
        let tick_errors = self.tick_errors.load(Ordering::Relaxed);
        let players = self.players_advanced.load(Ordering::Relaxed);
        let level_ups = self.level_ups.load(Ordering::Relaxed);
        let events = self.events_received.load(Ordering::Relaxed);
        let dropped = self.events_dropped.load(Ordering::Relaxed);
        let penalties = self.penalties.load(Ordering::Relaxed);
        let commands = self.commands.load(Ordering::Relaxed);

        format!(
            "# TYPE idlerpg_ticks_total counter\n\
idlerpg_ticks_total {}\n\
# TYPE idlerpg_tick_errors_total counter\n\
idlerpg_tick_errors_total {}\n\
# TYPE idlerpg_players_advanced_total counter\n\
idlerpg_players_advanced_total {}\n\
# TYPE idlerpg_level_ups_total counter\n\
idlerpg_level_ups_total {}\n\
# TYPE idlerpg_events_total counter\n\
idlerpg_events_total {}\n\
# TYPE idlerpg_events_dropped_total counter\n\
idlerpg_events_dropped_total {}\n\
# TYPE idlerpg_penalties_total counter\n\
idlerpg_penalties_total {}\n\
# TYPE idlerpg_commands_total counter\n\
idlerpg_commands_total {}\n",
            ticks, tick_errors, players, level_ups, events, dropped, penalties, commands
        )
    }
}
