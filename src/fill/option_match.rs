use crate::discovery::FieldOption;
use crate::matching::scorer::contains_word;

/// How well an option matches a requested value; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionRank {
    ExactValue,
    ExactValueIgnoreCase,
    ExactLabel,
    LabelContainsTarget,
    TargetContainsLabel,
}

pub fn rank_option(option: &FieldOption, target: &str) -> Option<OptionRank> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    if option.value == target {
        return Some(OptionRank::ExactValue);
    }
    if option.value.eq_ignore_ascii_case(target) {
        return Some(OptionRank::ExactValueIgnoreCase);
    }
    if option.label.trim().eq_ignore_ascii_case(target) {
        return Some(OptionRank::ExactLabel);
    }

    // Placeholders such as "Select..." never win on containment.
    if option.value.trim().is_empty() || option.label.trim().is_empty() {
        return None;
    }
    if contains_word(&option.label, target) {
        return Some(OptionRank::LabelContainsTarget);
    }
    if contains_word(target, option.label.trim()) {
        return Some(OptionRank::TargetContainsLabel);
    }
    None
}

/// Index of the best option for any of `targets`. Equal ranks prefer the
/// earlier target, then the earlier option.
pub fn best_option(options: &[FieldOption], targets: &[String]) -> Option<usize> {
    let mut best: Option<(OptionRank, usize, usize)> = None;

    for (target_index, target) in targets.iter().enumerate() {
        for (index, option) in options.iter().enumerate() {
            let Some(rank) = rank_option(option, target) else {
                continue;
            };
            let key = (rank, target_index, index);
            if best.is_none_or(|current| key < current) {
                best = Some(key);
            }
        }
    }
    best.map(|(_, _, index)| index)
}

/// Case-insensitive substring test used for checkbox groups.
pub fn option_mentions(option: &FieldOption, targets: &[String]) -> bool {
    let value = option.value.to_lowercase();
    let label = option.label.to_lowercase();
    targets.iter().any(|target| {
        let target = target.trim().to_lowercase();
        !target.is_empty() && (value.contains(&target) || label.contains(&target))
    })
}
