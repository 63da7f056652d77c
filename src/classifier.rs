use crate::features::FeatureVector;
use crate::label::MacroLabel;

const TEAMFIGHT_MIN_RECENT_DEATHS: u32 = 6;
const ROSHAN_MIN_OWN_CORES_ALIVE: u32 = 2;
const CONTEST_MIN_ENEMY_CORES_ALIVE: u32 = 2;
const CONTEST_MIN_RECENT_DEATHS: u32 = 2;
const SIEGE_MIN_GOLD_ADV: i64 = 10_000;
const PUSH_MIN_GOLD_ADV: i64 = 4_000;
const DEFEND_MAX_GOLD_ADV: i64 = -4_000;
const MAX_DEAD_FOR_PUSH_OR_DEFEND: u32 = 1;
const GANK_MIN_OWN_ALIVE: u32 = 3;
const GANK_MAX_RECENT_DEATHS: u32 = 2;
const STACK_MAX_ABS_GOLD_ADV: u64 = 2_000;

pub fn classify(features: &FeatureVector) -> MacroLabel {
    if features.recent_deaths >= TEAMFIGHT_MIN_RECENT_DEATHS {
        return MacroLabel::Teamfight;
    }

    // Falls through to the economic rules when neither roshan rule applies.
    if features.boss_alive {
        if features.enemy_core_dead >= 1
            && features.own_core_alive >= ROSHAN_MIN_OWN_CORES_ALIVE
        {
            return MacroLabel::TakeRoshan;
        }
        if features.own_core_alive >= ROSHAN_MIN_OWN_CORES_ALIVE
            && features.enemy_core_alive >= CONTEST_MIN_ENEMY_CORES_ALIVE
            && features.recent_deaths >= CONTEST_MIN_RECENT_DEATHS
        {
            return MacroLabel::ContestRoshan;
        }
    }

    if features.gold_adv > SIEGE_MIN_GOLD_ADV && features.enemy_t3_down {
        return MacroLabel::Siege;
    }

    if features.gold_adv > PUSH_MIN_GOLD_ADV
        && features.enemy_dead_total <= MAX_DEAD_FOR_PUSH_OR_DEFEND
    {
        return MacroLabel::Push;
    }

    if features.gold_adv < DEFEND_MAX_GOLD_ADV
        && features.own_dead_total <= MAX_DEAD_FOR_PUSH_OR_DEFEND
    {
        return MacroLabel::Defend;
    }

    if features.own_alive >= GANK_MIN_OWN_ALIVE
        && features.enemy_core_alive == 1
        && features.recent_deaths < GANK_MAX_RECENT_DEATHS
    {
        return MacroLabel::Gank;
    }

    if features.own_dead_total == 0
        && features.enemy_dead_total == 0
        && features.gold_adv.unsigned_abs() <= STACK_MAX_ABS_GOLD_ADV
    {
        return MacroLabel::Stack;
    }

    MacroLabel::DEFAULT
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::features::FeatureVector;
    use crate::label::MacroLabel;

    fn quiet_lane() -> FeatureVector {
        FeatureVector {
            own_alive: 5,
            enemy_alive: 5,
            own_core_alive: 2,
            enemy_core_alive: 2,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn all_zero_vector_is_a_stack() {
        assert_eq!(classify(&FeatureVector::default()), MacroLabel::Stack);
    }

    #[test]
    fn always_returns_one_of_the_known_labels() {
        let gold_values = [-20_000, -4_001, -4_000, -2_001, 0, 2_000, 4_000, 4_001, 10_001];
        for gold_adv in gold_values {
            for recent_deaths in 0..8 {
                for enemy_core_alive in 0..3 {
                    for boss_alive in [false, true] {
                        let features = FeatureVector {
                            gold_adv,
                            recent_deaths,
                            enemy_core_alive,
                            enemy_core_dead: 2 - enemy_core_alive,
                            boss_alive,
                            own_dead_total: recent_deaths % 3,
                            ..quiet_lane()
                        };
                        assert!(MacroLabel::ALL.contains(&classify(&features)));
                    }
                }
            }
        }
    }

    #[test]
    fn teamfight_outranks_siege() {
        let features = FeatureVector {
            recent_deaths: 6,
            gold_adv: 20_000,
            enemy_t3_down: true,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Teamfight);
    }

    #[test]
    fn take_roshan_needs_an_enemy_core_down_and_two_own_cores() {
        let features = FeatureVector {
            boss_alive: true,
            enemy_core_alive: 1,
            enemy_core_dead: 1,
            gold_adv: 20_000,
            enemy_t3_down: true,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::TakeRoshan);

        let without_boss = FeatureVector {
            boss_alive: false,
            ..features
        };
        assert_eq!(classify(&without_boss), MacroLabel::Siege);
    }

    #[test]
    fn take_roshan_outranks_contest_roshan() {
        let features = FeatureVector {
            boss_alive: true,
            enemy_core_alive: 2,
            enemy_core_dead: 1,
            recent_deaths: 3,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::TakeRoshan);
    }

    #[test]
    fn push_and_defend_outrank_gank() {
        let gank_shape = FeatureVector {
            enemy_core_alive: 1,
            enemy_core_dead: 1,
            ..quiet_lane()
        };
        assert_eq!(classify(&gank_shape), MacroLabel::Gank);

        let ahead = FeatureVector {
            gold_adv: 5_000,
            enemy_dead_total: 1,
            ..gank_shape
        };
        assert_eq!(classify(&ahead), MacroLabel::Push);

        let behind = FeatureVector {
            gold_adv: -5_000,
            ..gank_shape
        };
        assert_eq!(classify(&behind), MacroLabel::Defend);
    }

    #[test]
    fn gank_outranks_stack() {
        let features = FeatureVector {
            enemy_core_alive: 1,
            ..quiet_lane()
        };
        assert_eq!(features.own_dead_total + features.enemy_dead_total, 0);
        assert_eq!(classify(&features), MacroLabel::Gank);
    }

    #[test]
    fn extreme_gold_values_still_classify() {
        let features = FeatureVector {
            gold_adv: i64::MIN,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Defend);

        let features = FeatureVector {
            gold_adv: i64::MIN,
            own_dead_total: 3,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Farm);
    }

    #[test]
    fn contest_roshan_when_both_sides_have_cores_up_and_some_deaths() {
        let features = FeatureVector {
            boss_alive: true,
            recent_deaths: 2,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::ContestRoshan);
    }

    #[test]
    fn live_boss_without_matching_roshan_rule_falls_through() {
        let features = FeatureVector {
            boss_alive: true,
            gold_adv: 5_000,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Push);
    }

    #[test]
    fn push_threshold_is_strict() {
        let at_threshold = FeatureVector {
            gold_adv: 4_000,
            enemy_dead_total: 1,
            ..quiet_lane()
        };
        assert_ne!(classify(&at_threshold), MacroLabel::Push);

        let above_threshold = FeatureVector {
            gold_adv: 4_001,
            ..at_threshold
        };
        assert_eq!(classify(&above_threshold), MacroLabel::Push);
    }

    #[test]
    fn push_requires_at_most_one_enemy_dead() {
        let features = FeatureVector {
            gold_adv: 6_000,
            enemy_dead_total: 2,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Farm);
    }

    #[test]
    fn defend_when_behind_with_team_mostly_alive() {
        let features = FeatureVector {
            gold_adv: -4_001,
            own_dead_total: 1,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Defend);

        let at_threshold = FeatureVector {
            gold_adv: -4_000,
            ..features
        };
        assert_ne!(classify(&at_threshold), MacroLabel::Defend);
    }

    #[test]
    fn gank_when_a_single_enemy_core_is_up() {
        let features = FeatureVector {
            enemy_core_alive: 1,
            enemy_core_dead: 1,
            enemy_alive: 4,
            enemy_dead_total: 1,
            recent_deaths: 1,
            ..quiet_lane()
        };
        assert_eq!(classify(&features), MacroLabel::Gank);

        let busy = FeatureVector {
            recent_deaths: 2,
            ..features
        };
        assert_eq!(classify(&busy), MacroLabel::Farm);
    }

    #[test]
    fn stack_only_in_an_even_game_with_nobody_dead() {
        let even = FeatureVector {
            gold_adv: -2_000,
            ..quiet_lane()
        };
        assert_eq!(classify(&even), MacroLabel::Stack);

        let uneven = FeatureVector {
            gold_adv: 2_001,
            ..quiet_lane()
        };
        assert_eq!(classify(&uneven), MacroLabel::Farm);
    }
}
