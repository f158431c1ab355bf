//! Packet transit toward the destination node.

use blackhole_types::{Packet, Vec2};
use serde::{Deserialize, Serialize};

/// Distance below which a packet counts as arrived.
pub const DEFAULT_ARRIVAL_RADIUS: f64 = 5.0;

/// Smallest distance a [`TransitRule::FixedFraction`] packet covers per tick.
pub const DEFAULT_MIN_STEP: f64 = 3.0;

/// How far a packet advances each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitRule {
    /// Fixed distance per tick along the direction to the destination,
    /// never overshooting. Ticks to arrival are bounded by
    /// `distance / speed`.
    ConstantSpeed { speed: f64 },
    /// Fixed fraction of the remaining distance per tick, but never less
    /// than `min_step`. Slows down as it approaches the destination until
    /// the floor takes over.
    FixedFraction {
        fraction: f64,
        #[serde(default = "default_min_step")]
        min_step: f64,
    },
}

fn default_min_step() -> f64 {
    DEFAULT_MIN_STEP
}

impl Default for TransitRule {
    fn default() -> Self {
        TransitRule::ConstantSpeed { speed: 4.0 }
    }
}

/// Result of advancing a packet by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitStep {
    /// Still travelling; carries the remaining distance before the step.
    Moving { remaining: f64 },
    /// Within the arrival radius; the packet should be removed.
    Arrived,
}

impl TransitRule {
    /// Fixed-fraction transit with the default step floor.
    pub fn fixed_fraction(fraction: f64) -> Self {
        TransitRule::FixedFraction {
            fraction,
            min_step: DEFAULT_MIN_STEP,
        }
    }

    /// Lowest per-tick speed a packet can travel at while outside the
    /// arrival radius.
    ///
    /// A packet only catches a moving destination if this exceeds the
    /// destination's speed.
    pub fn min_speed(&self) -> f64 {
        match *self {
            TransitRule::ConstantSpeed { speed } => speed,
            TransitRule::FixedFraction { min_step, .. } => min_step,
        }
    }

    /// Advance `packet` toward `destination` (the destination node's current
    /// position).
    pub fn advance(
        &self,
        packet: &mut Packet,
        destination: Vec2,
        arrival_radius: f64,
    ) -> TransitStep {
        let delta = destination - packet.position;
        let distance = delta.length();

        if distance <= arrival_radius {
            return TransitStep::Arrived;
        }

        let step = match *self {
            TransitRule::ConstantSpeed { speed } => speed,
            TransitRule::FixedFraction { fraction, min_step } => {
                (distance * fraction).max(min_step)
            }
        }
        .min(distance);
        packet.position += delta.normalized() * step;
        packet.progress += step / distance;

        TransitStep::Moving {
            remaining: distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackhole_types::{NodeId, PacketId};

    fn packet_at(position: Vec2) -> Packet {
        Packet::new(PacketId(0), NodeId(0), NodeId(1), position, false, 0)
    }

    #[test]
    fn test_constant_speed_step() {
        let mut packet = packet_at(Vec2::new(0.0, 0.0));
        let rule = TransitRule::ConstantSpeed { speed: 4.0 };

        let step = rule.advance(&mut packet, Vec2::new(100.0, 0.0), DEFAULT_ARRIVAL_RADIUS);

        assert_eq!(step, TransitStep::Moving { remaining: 100.0 });
        assert_eq!(packet.position, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_fixed_fraction_step() {
        let mut packet = packet_at(Vec2::new(0.0, 0.0));
        let rule = TransitRule::FixedFraction {
            fraction: 0.02,
            min_step: 1.0,
        };

        rule.advance(&mut packet, Vec2::new(100.0, 50.0), DEFAULT_ARRIVAL_RADIUS);

        assert!((packet.position.x - 2.0).abs() < 1e-12);
        assert!((packet.position.y - 1.0).abs() < 1e-12);
        assert!((packet.progress - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_arrival_within_radius() {
        let mut packet = packet_at(Vec2::new(96.0, 0.0));
        let rule = TransitRule::default();

        let step = rule.advance(&mut packet, Vec2::new(100.0, 0.0), DEFAULT_ARRIVAL_RADIUS);
        assert_eq!(step, TransitStep::Arrived);
        assert_eq!(packet.position, Vec2::new(96.0, 0.0), "arrival does not move");
    }

    #[test]
    fn test_constant_speed_arrival_tick_bound() {
        let destination = Vec2::new(300.0, 400.0);
        let rule = TransitRule::ConstantSpeed { speed: 4.0 };
        let mut packet = packet_at(Vec2::ZERO);

        let mut ticks = 0;
        let mut last = f64::INFINITY;
        loop {
            match rule.advance(&mut packet, destination, DEFAULT_ARRIVAL_RADIUS) {
                TransitStep::Arrived => break,
                TransitStep::Moving { remaining } => {
                    assert!(remaining < last, "distance must shrink every tick");
                    last = remaining;
                }
            }
            ticks += 1;
            assert!(ticks <= 125, "500 units at speed 4 arrive within 125 ticks");
        }
        assert!(ticks >= 124);
    }

    #[test]
    fn test_fixed_fraction_floor_step() {
        let mut packet = packet_at(Vec2::new(0.0, 0.0));
        let rule = TransitRule::fixed_fraction(0.02);

        // 2% of 100 is below the floor.
        rule.advance(&mut packet, Vec2::new(100.0, 0.0), DEFAULT_ARRIVAL_RADIUS);
        assert!((packet.position.x - DEFAULT_MIN_STEP).abs() < 1e-12);
        assert!((packet.progress - 0.03).abs() < 1e-12);

        // Never overshoots.
        let mut packet = packet_at(Vec2::new(0.0, 0.0));
        let rule = TransitRule::FixedFraction {
            fraction: 0.02,
            min_step: 50.0,
        };
        rule.advance(&mut packet, Vec2::new(6.0, 0.0), DEFAULT_ARRIVAL_RADIUS);
        assert_eq!(packet.position, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_fixed_fraction_converges_monotonically() {
        let destination = Vec2::new(1000.0, 0.0);
        let rule = TransitRule::fixed_fraction(0.02);
        let mut packet = packet_at(Vec2::ZERO);

        let mut last = f64::INFINITY;
        let mut ticks = 0;
        while let TransitStep::Moving { remaining } =
            rule.advance(&mut packet, destination, DEFAULT_ARRIVAL_RADIUS)
        {
            assert!(remaining < last);
            last = remaining;
            ticks += 1;
            assert!(ticks < 1000);
        }
        // Pure 2% steps would need 263 ticks; the floor cuts the tail short.
        assert!(ticks > 100);
        assert!(ticks < 263);
    }

    #[test]
    fn test_catches_moving_destination() {
        let rules = [
            TransitRule::default(),
            TransitRule::fixed_fraction(0.02),
        ];
        for rule in rules {
            let mut packet = packet_at(Vec2::ZERO);
            let mut destination = Vec2::new(100.0, 0.0);
            // Flees at just under the slowest transit speed.
            let velocity = Vec2::new(rule.min_speed() - 0.5, 0.0);

            let mut ticks = 0;
            loop {
                destination += velocity;
                if rule.advance(&mut packet, destination, DEFAULT_ARRIVAL_RADIUS)
                    == TransitStep::Arrived
                {
                    break;
                }
                ticks += 1;
                assert!(ticks <= 400, "{rule:?} never caught up");
            }
        }
    }

    #[test]
    fn test_min_speed() {
        assert_eq!(TransitRule::ConstantSpeed { speed: 4.0 }.min_speed(), 4.0);
        assert_eq!(TransitRule::fixed_fraction(0.02).min_speed(), DEFAULT_MIN_STEP);
    }
}
