use crate::error::FleetError;

/// Load to serve in one hour plus the spinning reserve to hold on top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourDemand {
    /// Demand the committed units must dispatch (MW).
    pub demand_mw: f64,
    /// Extra committed capacity required above demand (MW).
    pub reserve_mw: f64,
}

impl HourDemand {
    pub fn new(demand_mw: f64, reserve_mw: f64) -> Self {
        Self {
            demand_mw,
            reserve_mw,
        }
    }

    /// Hour with no reserve requirement.
    pub fn demand_only(demand_mw: f64) -> Self {
        Self::new(demand_mw, 0.0)
    }

    /// Committed capacity needed to cover demand and reserve (MW).
    pub fn required_capacity_mw(&self) -> f64 {
        self.demand_mw + self.reserve_mw
    }

    /// Absolute slack used when comparing bound sums against this hour.
    pub(crate) fn slack_mw(&self) -> f64 {
        1e-9 * self.required_capacity_mw().max(1.0)
    }

    /// Whether a committed set with the given bound sums can serve the hour.
    pub fn is_covered_by(&self, p_min_sum: f64, p_max_sum: f64) -> bool {
        let slack = self.slack_mw();
        p_min_sum <= self.demand_mw + slack && p_max_sum + slack >= self.required_capacity_mw()
    }
}

/// Ordered hourly demand values, validated non-negative.
///
/// # Examples
///
/// ```
/// use thermal_dispatch::fleet::DemandProfile;
///
/// let profile = DemandProfile::with_reserve_fraction(vec![700.0, 800.0], 0.1).unwrap();
/// assert_eq!(profile.len(), 2);
/// assert!((profile[1].reserve_mw - 80.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DemandProfile {
    hours: Vec<HourDemand>,
}

impl DemandProfile {
    /// Builds a profile with explicit per-hour reserve.
    ///
    /// # Errors
    ///
    /// Returns a `FleetError` if the slices differ in length or any value is
    /// negative or non-finite.
    pub fn new(demand_mw: Vec<f64>, reserve_mw: Vec<f64>) -> Result<Self, FleetError> {
        if demand_mw.len() != reserve_mw.len() {
            return Err(FleetError::LengthMismatch {
                demand: demand_mw.len(),
                reserve: reserve_mw.len(),
            });
        }

        let hours = demand_mw
            .into_iter()
            .zip(reserve_mw)
            .enumerate()
            .map(|(hour, (demand, reserve))| {
                check_value(hour, "demand", demand)?;
                check_value(hour, "reserve", reserve)?;
                Ok(HourDemand::new(demand, reserve))
            })
            .collect::<Result<Vec<_>, FleetError>>()?;

        Ok(Self { hours })
    }

    /// Builds a profile without reserve.
    ///
    /// # Errors
    ///
    /// Returns a `FleetError` if any value is negative or non-finite.
    pub fn from_demand(demand_mw: Vec<f64>) -> Result<Self, FleetError> {
        let reserve = vec![0.0; demand_mw.len()];
        Self::new(demand_mw, reserve)
    }

    /// Builds a profile whose reserve is a fixed fraction of each hour's demand.
    ///
    /// # Errors
    ///
    /// Returns a `FleetError` if any demand is negative or non-finite, or if
    /// `fraction` is negative.
    pub fn with_reserve_fraction(demand_mw: Vec<f64>, fraction: f64) -> Result<Self, FleetError> {
        let reserve = demand_mw.iter().map(|d| d * fraction).collect();
        Self::new(demand_mw, reserve)
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn hours(&self) -> &[HourDemand] {
        &self.hours
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourDemand> {
        self.hours.iter()
    }

    /// Highest demand across the profile (MW), zero when empty.
    pub fn peak_mw(&self) -> f64 {
        self.hours.iter().map(|h| h.demand_mw).fold(0.0, f64::max)
    }
}

impl std::ops::Index<usize> for DemandProfile {
    type Output = HourDemand;

    fn index(&self, index: usize) -> &Self::Output {
        &self.hours[index]
    }
}

fn check_value(hour: usize, what: &str, value: f64) -> Result<(), FleetError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FleetError::InvalidDemand {
            hour,
            message: format!("{what} must be finite and >= 0, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_capacity_includes_reserve() {
        let h = HourDemand::new(100.0, 10.0);
        assert_eq!(h.required_capacity_mw(), 110.0);
    }

    #[test]
    fn coverage_rule() {
        let h = HourDemand::new(100.0, 10.0);
        assert!(h.is_covered_by(50.0, 110.0));
        assert!(h.is_covered_by(100.0, 200.0));
        assert!(!h.is_covered_by(101.0, 200.0));
        assert!(!h.is_covered_by(50.0, 105.0));
    }

    #[test]
    fn rejects_negative_demand() {
        let err = DemandProfile::from_demand(vec![10.0, -1.0]).unwrap_err();
        assert!(matches!(err, FleetError::InvalidDemand { hour: 1, .. }));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = DemandProfile::new(vec![10.0, 20.0], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            FleetError::LengthMismatch {
                demand: 2,
                reserve: 1
            }
        );
    }

    #[test]
    fn peak_of_profile() {
        let profile = DemandProfile::from_demand(vec![450.0, 600.0, 280.0]).unwrap();
        assert_eq!(profile.peak_mw(), 600.0);
        assert_eq!(profile[2].reserve_mw, 0.0);
    }
}
