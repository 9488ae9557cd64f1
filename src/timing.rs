//! Cooldown trigger counting and buff uptime.
//!
//! All functions are total: degenerate inputs map to documented sentinel
//! values instead of errors. Infinite cooldowns model one-shot abilities and
//! infinite fight durations model steady-state farming.

/// Number of times a cooldown-gated ability fires within a fight, counting a
/// clipped final activation as a fraction.
pub fn triggers(cooldown: f64, duration: f64, fight_duration: f64) -> f64 {
    if duration <= 0.0 || fight_duration <= 0.0 {
        return 0.0;
    }

    // Spammable: the buff is always up, every activation back to back
    if cooldown <= 0.0 || cooldown <= duration {
        if fight_duration.is_infinite() {
            return f64::INFINITY;
        }
        return fight_duration / duration;
    }

    // One-shot ability
    if cooldown.is_infinite() {
        if fight_duration.is_infinite() || duration <= fight_duration {
            return 1.0;
        }
        return fight_duration / duration;
    }

    if fight_duration.is_infinite() {
        return f64::INFINITY;
    }

    if duration >= fight_duration {
        return fight_duration / duration;
    }

    let full_triggers = ((fight_duration - duration) / cooldown).floor() + 1.0;
    let next_start = full_triggers * cooldown;
    if next_start < fight_duration {
        let partial = ((fight_duration - next_start) / duration).min(1.0);
        full_triggers + partial
    } else {
        full_triggers
    }
}

/// Fraction of the fight during which the buff is active, in [0, 1].
pub fn buff_uptime(cooldown: f64, duration: f64, fight_duration: f64) -> f64 {
    if duration <= 0.0 || fight_duration <= 0.0 {
        return 0.0;
    }

    if fight_duration.is_infinite() {
        if cooldown <= 0.0 {
            return 1.0;
        }
        if cooldown.is_infinite() {
            return 0.0;
        }
        return (duration / cooldown).min(1.0);
    }

    let active = triggers(cooldown, duration, fight_duration) * duration;
    (active.min(fight_duration) / fight_duration).clamp(0.0, 1.0)
}

/// Average value of a conditional bonus that only applies while a buff is up.
pub fn effective_uptime_bonus(
    bonus: f64,
    cooldown: f64,
    duration: f64,
    fight_duration: f64,
) -> f64 {
    bonus * buff_uptime(cooldown, duration, fight_duration)
}

/// Casts per second of a skill with the given base interval once attack
/// speed is applied. Attack speed is a percentage (50.0 = +50%).
pub fn casts_per_second(base_interval: f64, attack_speed_pct: f64) -> f64 {
    if base_interval <= 0.0 {
        return 0.0;
    }
    (1.0 + attack_speed_pct.max(0.0) / 100.0) / base_interval
}
