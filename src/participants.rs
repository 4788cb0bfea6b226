use cylinder_histories::{Participant, SeriesStyle};

/// Yellow used for the UM curves.
const UM_YELLOW: SeriesStyle = SeriesStyle::dashed(191, 191, 0);
/// Blue used for the AFRL curves.
const AFRL_BLUE: SeriesStyle = SeriesStyle::dashed(0, 0, 255);

/// Groups taking part in the cylinder comparison, in plotting order.
///
/// Each group's data lives in a directory named after it, and its curves are
/// drawn dashed so overlapping submissions remain distinguishable.
#[must_use]
pub fn default_roster() -> Vec<Participant> {
    vec![
        Participant::new("UM", UM_YELLOW),
        Participant::new("AFRL", AFRL_BLUE),
    ]
}
