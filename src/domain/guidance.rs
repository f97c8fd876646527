//! Bidding guidance: break-even and tiered maximum-bid thresholds, plus
//! classification of a live bid into a zone.
//!
//! Naive threshold arithmetic produces negative bid ranges whenever the
//! scrap value cannot support the cost structure or the profit target, so
//! two escape hatches exist: an `unprofitable` result when costs exceed
//! scrap value, and a `target_too_high` result that substitutes a target
//! the vehicle can actually generate.

use serde::{Deserialize, Serialize};

/// Dollars kept in hand below break-even before a bid counts as "caution".
const BREAK_EVEN_BUFFER: i64 = 100;

/// Qualitative bid bands, cheapest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidZone {
    Excellent,
    Good,
    Acceptable,
    Caution,
    Avoid,
}

impl BidZone {
    pub fn description(self) -> &'static str {
        match self {
            BidZone::Excellent => "Excellent deal",
            BidZone::Good => "Good deal",
            BidZone::Acceptable => "Marginal",
            BidZone::Caution => "Break-even risk",
            BidZone::Avoid => "Likely loss",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BidZone::Excellent | BidZone::Good => "#16a34a",
            BidZone::Acceptable => "#facc15",
            BidZone::Caution => "#f97316",
            BidZone::Avoid => "#dc2626",
        }
    }
}

/// One bid interval. `max` is inclusive; `None` means unbounded above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub zone: BidZone,
    pub min: i64,
    pub max: Option<i64>,
}

/// Output of [`guide`]: break-even, tiered max bids and infeasibility flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingGuidance {
    pub scrap_value: i64,
    pub total_costs: i64,
    /// Target actually used for the thresholds; differs from
    /// `requested_profit` when the requested target was unachievable.
    pub target_profit: i64,
    pub requested_profit: i64,
    pub max_bid_break_even: i64,
    pub max_bid_min_profit: i64,
    pub max_bid_good_profit: i64,
    /// Costs exceed scrap value; no bid can be profitable.
    pub unprofitable: bool,
    /// Shortfall of scrap value against costs, zero unless `unprofitable`.
    pub deficit: i64,
    /// Requested target exceeds the profit achievable at a $0 bid.
    pub target_too_high: bool,
    /// Profit at a $0 bid, zero when `unprofitable`.
    pub max_possible_profit: i64,
    /// 25%-of-maximum target suggested alongside the substituted realistic
    /// target, zero unless `target_too_high`.
    pub conservative_target: i64,
    pub message: Option<String>,
    pub suggestion: Option<String>,
}

impl BiddingGuidance {
    /// The five ordered zones. Lower bounds clamp to zero so zones collapse
    /// rather than invert at the cheap end. The acceptable zone can still
    /// come out empty or inverted (min above max) when the target profit is
    /// under the break-even buffer; [`classify_current_bid`] skips such a
    /// zone, so a bid always lands in exactly one zone regardless.
    pub fn zones(&self) -> [ZoneBounds; 5] {
        let break_even = self.max_bid_break_even.max(0);
        let caution_floor = (break_even - BREAK_EVEN_BUFFER).max(0);
        [
            ZoneBounds {
                zone: BidZone::Excellent,
                min: 0,
                max: Some(self.max_bid_good_profit),
            },
            ZoneBounds {
                zone: BidZone::Good,
                min: self.max_bid_good_profit,
                max: Some(self.max_bid_min_profit),
            },
            ZoneBounds {
                zone: BidZone::Acceptable,
                min: self.max_bid_min_profit,
                max: Some(caution_floor),
            },
            ZoneBounds {
                zone: BidZone::Caution,
                min: caution_floor,
                max: Some(break_even),
            },
            ZoneBounds {
                zone: BidZone::Avoid,
                min: break_even,
                max: None,
            },
        ]
    }
}

/// Computes bidding guidance from scrap value, costs and a profit target.
pub fn guide(scrap_value: i64, fees: i64, transport_cost: i64, target_profit: i64) -> BiddingGuidance {
    let total_costs = fees + transport_cost;
    let max_bid_break_even = scrap_value - total_costs;

    if max_bid_break_even <= 0 {
        return BiddingGuidance {
            scrap_value,
            total_costs,
            target_profit,
            requested_profit: target_profit,
            max_bid_break_even: 0,
            max_bid_min_profit: 0,
            max_bid_good_profit: 0,
            unprofitable: true,
            deficit: max_bid_break_even.abs(),
            target_too_high: false,
            max_possible_profit: 0,
            conservative_target: 0,
            message: Some(format!(
                "This lot cannot be profitable. Scrap value (${scrap_value}) is less than costs (${total_costs})."
            )),
            suggestion: None,
        };
    }

    // Profit achievable at a $0 bid.
    let max_possible_profit = max_bid_break_even;

    if target_profit > max_possible_profit {
        let realistic_target = max_possible_profit / 2;
        let conservative_target = max_possible_profit / 4;
        return BiddingGuidance {
            scrap_value,
            total_costs,
            target_profit: realistic_target,
            requested_profit: target_profit,
            max_bid_break_even,
            max_bid_min_profit: (max_bid_break_even - realistic_target).max(0),
            max_bid_good_profit: (max_bid_break_even - 2 * realistic_target).max(0),
            unprofitable: false,
            deficit: 0,
            target_too_high: true,
            max_possible_profit,
            conservative_target,
            message: Some(format!(
                "Target profit (${target_profit}) exceeds what this vehicle can generate. \
                 Maximum possible profit is ${max_possible_profit} (at a $0 bid)."
            )),
            suggestion: Some(format!(
                "For this vehicle, realistic targets are ${conservative_target}-${realistic_target}."
            )),
        };
    }

    BiddingGuidance {
        scrap_value,
        total_costs,
        target_profit,
        requested_profit: target_profit,
        max_bid_break_even,
        max_bid_min_profit: (max_bid_break_even - target_profit).max(0),
        max_bid_good_profit: (max_bid_break_even - 2 * target_profit).max(0),
        unprofitable: false,
        deficit: 0,
        target_too_high: false,
        max_possible_profit,
        conservative_target: 0,
        message: None,
        suggestion: None,
    }
}

/// Status of a live bid against computed guidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatusKind {
    NoBidsYet,
    NotProfitable,
    Excellent,
    Good,
    Acceptable,
    Caution,
    Avoid,
}

impl BidStatusKind {
    pub fn label(self) -> &'static str {
        match self {
            BidStatusKind::NoBidsYet => "No Bids Yet",
            BidStatusKind::NotProfitable => "Not Profitable",
            BidStatusKind::Excellent => "Excellent Zone",
            BidStatusKind::Good => "Good Zone",
            BidStatusKind::Acceptable => "Marginal Zone",
            BidStatusKind::Caution => "Caution Zone",
            BidStatusKind::Avoid => "Avoid Zone",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BidStatusKind::NoBidsYet | BidStatusKind::Excellent | BidStatusKind::Good => "#16a34a",
            BidStatusKind::Acceptable => "#facc15",
            BidStatusKind::Caution => "#f97316",
            BidStatusKind::NotProfitable | BidStatusKind::Avoid => "#dc2626",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidStatus {
    pub kind: BidStatusKind,
    pub should_bid: bool,
    pub message: String,
}

/// Maps a live bid into exactly one zone, cheapest zone first with inclusive
/// upper bounds, so ties at a boundary land in the cheaper zone. A $0 bid is
/// special-cased: it signals an untouched lot, not an excellent price.
pub fn classify_current_bid(current_bid: i64, guidance: &BiddingGuidance) -> BidStatus {
    let break_even = guidance.max_bid_break_even;

    if current_bid == 0 {
        return if break_even > 0 {
            BidStatus {
                kind: BidStatusKind::NoBidsYet,
                should_bid: true,
                message: "Good opportunity to bid on this lot.".to_string(),
            }
        } else {
            BidStatus {
                kind: BidStatusKind::NotProfitable,
                should_bid: false,
                message: "This lot cannot be profitable at any bid amount.".to_string(),
            }
        };
    }

    // Highest bid still worth recommending out loud.
    let max_recommended = if guidance.max_bid_min_profit > 0 {
        guidance.max_bid_min_profit
    } else {
        ((break_even as f64) * 0.6).round() as i64
    }
    .max(0);

    if current_bid <= guidance.max_bid_good_profit && guidance.max_bid_good_profit > 0 {
        BidStatus {
            kind: BidStatusKind::Excellent,
            should_bid: true,
            message: "Strong buy! Current bid is in the excellent range.".to_string(),
        }
    } else if current_bid <= guidance.max_bid_min_profit && guidance.max_bid_min_profit > 0 {
        BidStatus {
            kind: BidStatusKind::Good,
            should_bid: true,
            message: format!("Good opportunity. Stay below ${max_recommended} for the target profit."),
        }
    } else if current_bid <= (break_even - BREAK_EVEN_BUFFER).max(0) {
        let stop_at = ((break_even as f64) * 0.8).round() as i64;
        BidStatus {
            kind: BidStatusKind::Acceptable,
            should_bid: true,
            message: format!("Low profit margin. Consider stopping at ${stop_at}."),
        }
    } else if current_bid <= break_even {
        BidStatus {
            kind: BidStatusKind::Caution,
            should_bid: false,
            message: format!(
                "High risk! Approaching break-even at ${break_even}. Not recommended."
            ),
        }
    } else {
        BidStatus {
            kind: BidStatusKind::Avoid,
            should_bid: false,
            message: "Do not bid. Current bid exceeds break-even; you will lose money.".to_string(),
        }
    }
}

/// Profit meter for quick display: label, fill percent and color.
#[derive(Clone, Debug, PartialEq)]
pub struct BuyRecommendation {
    pub label: &'static str,
    pub meter_percent: f64,
    pub color: &'static str,
}

pub fn buy_recommendation(profit: i64) -> BuyRecommendation {
    // Meter centers at 50% and scales by $1000 of profit either way.
    let scaled = 50.0 + (profit as f64 / 1000.0) * 50.0;
    if profit < 0 {
        BuyRecommendation {
            label: "Bad Buy",
            meter_percent: scaled.max(0.0),
            color: "#dc2626",
        }
    } else if profit > 0 {
        BuyRecommendation {
            label: "Good Buy",
            meter_percent: scaled.min(100.0),
            color: "#16a34a",
        }
    } else {
        BuyRecommendation {
            label: "Break-even",
            meter_percent: 50.0,
            color: "#facc15",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_case_thresholds() {
        let guidance = guide(1000, 180, 100, 500);
        assert_eq!(guidance.total_costs, 280);
        assert_eq!(guidance.max_bid_break_even, 720);
        assert_eq!(guidance.max_bid_min_profit, 220);
        // 720 - 2*500 = -280, clamped.
        assert_eq!(guidance.max_bid_good_profit, 0);
        assert!(!guidance.unprofitable);
        assert!(!guidance.target_too_high);
    }

    #[test]
    fn unprofitable_lot_flags_deficit() {
        let guidance = guide(200, 180, 100, 500);
        assert!(guidance.unprofitable);
        assert_eq!(guidance.deficit, 80);
        assert_eq!(guidance.max_bid_break_even, 0);
        assert_eq!(guidance.max_bid_min_profit, 0);
        assert_eq!(guidance.max_bid_good_profit, 0);
    }

    #[test]
    fn unrealistic_target_is_substituted() {
        let guidance = guide(1000, 180, 100, 800);
        assert!(guidance.target_too_high);
        assert!(!guidance.unprofitable);
        assert_eq!(guidance.requested_profit, 800);
        assert_eq!(guidance.max_possible_profit, 720);
        assert_eq!(guidance.target_profit, 360);
        assert_eq!(guidance.conservative_target, 180);
        // Thresholds recomputed with the substituted target.
        assert_eq!(guidance.max_bid_min_profit, 360);
        assert_eq!(guidance.max_bid_good_profit, 0);
    }

    #[test]
    fn zones_are_ordered_and_clamped() {
        let guidance = guide(2000, 180, 100, 300);
        let zones = guidance.zones();
        assert_eq!(zones[0].zone, BidZone::Excellent);
        assert_eq!(zones[0].max, Some(1120)); // 1720 - 600
        assert_eq!(zones[1].max, Some(1420)); // 1720 - 300
        assert_eq!(zones[2].max, Some(1620)); // 1720 - 100
        assert_eq!(zones[3].max, Some(1720));
        assert_eq!(zones[4].max, None);
        for pair in zones.windows(2) {
            assert!(pair[0].max.unwrap() >= pair[1].min || pair[1].min == 0);
            assert!(pair[0].min <= pair[1].min);
        }
    }

    #[test]
    fn tiny_target_inverts_the_acceptable_zone_but_classification_stays_total() {
        // target 50: break-even 720, min-profit 670, good-profit 620,
        // caution floor 620. Acceptable is inverted (670 > 620).
        let guidance = guide(1000, 180, 100, 50);
        let zones = guidance.zones();
        assert_eq!(zones[2].zone, BidZone::Acceptable);
        assert!(zones[2].min > zones[2].max.unwrap());

        // Every bid still lands in exactly one zone; the inverted zone is
        // simply never chosen.
        assert_eq!(classify_current_bid(620, &guidance).kind, BidStatusKind::Excellent);
        assert_eq!(classify_current_bid(670, &guidance).kind, BidStatusKind::Good);
        assert_eq!(classify_current_bid(700, &guidance).kind, BidStatusKind::Caution);
        assert_eq!(classify_current_bid(721, &guidance).kind, BidStatusKind::Avoid);
    }

    #[test]
    fn zero_bid_is_favorable_when_break_even_positive() {
        let guidance = guide(1000, 180, 100, 500);
        let status = classify_current_bid(0, &guidance);
        assert_eq!(status.kind, BidStatusKind::NoBidsYet);
        assert!(status.should_bid);
    }

    #[test]
    fn zero_bid_on_unprofitable_lot() {
        let guidance = guide(200, 180, 100, 500);
        let status = classify_current_bid(0, &guidance);
        assert_eq!(status.kind, BidStatusKind::NotProfitable);
        assert!(!status.should_bid);
    }

    #[test]
    fn bid_above_break_even_is_avoid() {
        let guidance = guide(1000, 180, 100, 500);
        let status = classify_current_bid(721, &guidance);
        assert_eq!(status.kind, BidStatusKind::Avoid);
        assert!(!status.should_bid);
    }

    #[test]
    fn boundary_ties_land_in_the_cheaper_zone() {
        let guidance = guide(2000, 180, 100, 300);
        // Upper bounds: excellent 1120, good 1420, acceptable 1620, caution 1720.
        assert_eq!(
            classify_current_bid(1120, &guidance).kind,
            BidStatusKind::Excellent
        );
        assert_eq!(
            classify_current_bid(1420, &guidance).kind,
            BidStatusKind::Good
        );
        assert_eq!(
            classify_current_bid(1620, &guidance).kind,
            BidStatusKind::Acceptable
        );
        assert_eq!(
            classify_current_bid(1720, &guidance).kind,
            BidStatusKind::Caution
        );
        assert_eq!(
            classify_current_bid(1721, &guidance).kind,
            BidStatusKind::Avoid
        );
    }

    #[test]
    fn should_bid_tracks_the_zone() {
        let guidance = guide(2000, 180, 100, 300);
        assert!(classify_current_bid(1000, &guidance).should_bid);
        assert!(classify_current_bid(1500, &guidance).should_bid);
        assert!(!classify_current_bid(1700, &guidance).should_bid);
        assert!(!classify_current_bid(2000, &guidance).should_bid);
    }

    #[test]
    fn guide_is_pure() {
        assert_eq!(guide(1500, 180, 100, 400), guide(1500, 180, 100, 400));
    }

    #[test]
    fn buy_meter_scales_and_clamps() {
        assert_eq!(buy_recommendation(0).label, "Break-even");
        let good = buy_recommendation(500);
        assert_eq!(good.label, "Good Buy");
        assert_eq!(good.meter_percent, 75.0);
        let flooded = buy_recommendation(5000);
        assert_eq!(flooded.meter_percent, 100.0);
        let bad = buy_recommendation(-2000);
        assert_eq!(bad.label, "Bad Buy");
        assert_eq!(bad.meter_percent, 0.0);
    }
}
