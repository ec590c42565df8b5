//! Age rebinning for aggregated cohort biomass.
//!
//! Rounds cohort ages up to the next multiple of the succession timestep so
//! that cohorts line up with the time steps the simulation actually visits.

use std::collections::BTreeMap;

/// Aggregate biomass keyed by cohort age
pub type AgeBiomass = BTreeMap<u32, u64>;

/// Round every age up to a multiple of `timestep`, summing biomass that lands in the same bin.
///
/// A timestep of zero or less disables rebinning and returns the input unchanged.
pub fn bin_ages(age_biomass: &AgeBiomass, timestep: i32) -> AgeBiomass {
    let Ok(step) = u32::try_from(timestep) else {
        return age_biomass.clone();
    };
    if step == 0 {
        return age_biomass.clone();
    }

    let mut binned = AgeBiomass::new();
    for (&age, &biomass) in age_biomass {
        let bin = if age % step == 0 {
            age
        } else {
            // saturates only for ages within one step of u32::MAX
            (age / step + 1).saturating_mul(step)
        };
        *binned.entry(bin).or_insert(0) += biomass;
    }
    binned
}
