//! Migratability classification and resource aggregation.
//!
//! Every VM lands in exactly one [`MigratabilityClass`], derived from the
//! severity categories of its attached concerns. Aggregates follow the
//! reporting convention of the source data: the *migratable* slice means
//! "not blocked" (no `Critical` concern) and therefore contains the
//! with-warnings slice, so for every resource kind
//! `total_for_migratable + total_for_not_migratable == total`.
//!
//! # Examples
//!
//! ```
//! use vm_inventory_core::{Concern, MigratabilityClass};
//!
//! let warning = Concern { category: "Warning".into(), ..Concern::default() };
//! assert_eq!(
//!     MigratabilityClass::from_concerns(std::slice::from_ref(&warning)),
//!     MigratabilityClass::MigratableWithWarnings,
//! );
//! assert!(MigratabilityClass::from_concerns(&[]).is_migratable());
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Concern;

/// The three mutually exclusive migratability classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigratabilityClass {
    /// No concerns, or only informational ones.
    Migratable,
    /// At least one `Warning` concern and no `Critical` ones.
    MigratableWithWarnings,
    /// At least one `Critical` concern.
    NotMigratable,
}

impl MigratabilityClass {
    /// Classifies a VM from its concern collection.
    ///
    /// Category literals are matched case-sensitively; anything other
    /// than `"Warning"` or `"Critical"` is informational.
    pub fn from_concerns(concerns: &[Concern]) -> Self {
        let has_critical = concerns.iter().any(|c| c.category == Concern::CRITICAL);
        let has_warning = concerns.iter().any(|c| c.category == Concern::WARNING);
        Self::from_flags(has_warning, has_critical)
    }

    /// Classifies from precomputed severity flags (as produced by the
    /// store's classification query).
    pub fn from_flags(has_warning: bool, has_critical: bool) -> Self {
        if has_critical {
            Self::NotMigratable
        } else if has_warning {
            Self::MigratableWithWarnings
        } else {
            Self::Migratable
        }
    }

    /// True for any class that is not blocked by a critical concern.
    pub fn is_migratable(self) -> bool {
        !matches!(self, Self::NotMigratable)
    }
}

/// VM counts per migratability class over a filtered population.
///
/// `migratable` counts every VM without a `Critical` concern, so it
/// includes the `migratable_with_warnings` VMs;
/// `migratable + not_migratable == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratabilityCounts {
    pub total: u64,
    pub migratable: u64,
    pub migratable_with_warnings: u64,
    pub not_migratable: u64,
}

impl MigratabilityCounts {
    /// Folds a stream of per-VM classes into counts.
    pub fn from_classes(classes: impl IntoIterator<Item = MigratabilityClass>) -> Self {
        classes
            .into_iter()
            .fold(Self::default(), |acc, class| acc.tally(class))
    }

    fn tally(mut self, class: MigratabilityClass) -> Self {
        self.total += 1;
        match class {
            MigratabilityClass::Migratable => self.migratable += 1,
            MigratabilityClass::MigratableWithWarnings => {
                self.migratable += 1;
                self.migratable_with_warnings += 1;
            }
            MigratabilityClass::NotMigratable => self.not_migratable += 1,
        }
        self
    }
}

/// Totals for a single resource kind, partitioned by migratability class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    pub total: i64,
    pub total_for_migratable: i64,
    pub total_for_migratable_with_warnings: i64,
    pub total_for_not_migratable: i64,
}

impl ResourceBreakdown {
    fn add(&mut self, value: i64, class: MigratabilityClass) {
        self.total += value;
        match class {
            MigratabilityClass::Migratable => self.total_for_migratable += value,
            MigratabilityClass::MigratableWithWarnings => {
                self.total_for_migratable += value;
                self.total_for_migratable_with_warnings += value;
            }
            MigratabilityClass::NotMigratable => self.total_for_not_migratable += value,
        }
    }
}

/// The resource figures of a single VM, as selected by the store's
/// per-VM resource query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmResources {
    pub cpu_cores: i64,
    pub ram_gb: i64,
    pub disk_count: i64,
    pub disk_gb: i64,
    pub nic_count: i64,
}

/// One [`ResourceBreakdown`] per resource kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBreakdowns {
    pub cpu_cores: ResourceBreakdown,
    pub ram_gb: ResourceBreakdown,
    pub disk_count: ResourceBreakdown,
    pub disk_gb: ResourceBreakdown,
    pub nic_count: ResourceBreakdown,
}

impl ResourceBreakdowns {
    /// Folds per-VM resource samples into breakdowns.
    pub fn from_samples(
        samples: impl IntoIterator<Item = (VmResources, MigratabilityClass)>,
    ) -> Self {
        samples
            .into_iter()
            .fold(Self::default(), |acc, (res, class)| acc.accumulate(res, class))
    }

    fn accumulate(mut self, res: VmResources, class: MigratabilityClass) -> Self {
        self.cpu_cores.add(res.cpu_cores, class);
        self.ram_gb.add(res.ram_gb, class);
        self.disk_count.add(res.disk_count, class);
        self.disk_gb.add(res.disk_gb, class);
        self.nic_count.add(res.nic_count, class);
        self
    }
}

/// Plain resource totals across a filtered VM population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalResources {
    pub total_cpu_cores: i64,
    pub total_ram_gb: i64,
    pub total_disk_count: i64,
    pub total_disk_gb: i64,
    pub total_nic_count: i64,
}

impl TotalResources {
    /// Sums per-VM resource samples.
    pub fn from_samples(samples: impl IntoIterator<Item = VmResources>) -> Self {
        samples.into_iter().fold(Self::default(), |mut acc, res| {
            acc.total_cpu_cores += res.cpu_cores;
            acc.total_ram_gb += res.ram_gb;
            acc.total_disk_count += res.disk_count;
            acc.total_disk_gb += res.disk_gb;
            acc.total_nic_count += res.nic_count;
            acc
        })
    }
}

/// A labeled concern aggregated over the VM population: how many VMs
/// exhibit the concern with this label and category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationIssue {
    pub label: String,
    pub category: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concern(category: &str) -> Concern {
        Concern {
            id: "c".into(),
            label: "l".into(),
            category: category.into(),
            assessment: String::new(),
        }
    }

    #[test]
    fn critical_wins_over_warning() {
        let concerns = vec![concern("Warning"), concern("Critical")];
        assert_eq!(
            MigratabilityClass::from_concerns(&concerns),
            MigratabilityClass::NotMigratable
        );
    }

    #[test]
    fn information_only_is_migratable() {
        let concerns = vec![concern("Information")];
        assert_eq!(
            MigratabilityClass::from_concerns(&concerns),
            MigratabilityClass::Migratable
        );
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let concerns = vec![concern("critical"), concern("WARNING")];
        assert_eq!(
            MigratabilityClass::from_concerns(&concerns),
            MigratabilityClass::Migratable
        );
    }

    #[test]
    fn counts_include_warning_vms_in_migratable() {
        let counts = MigratabilityCounts::from_classes([
            MigratabilityClass::MigratableWithWarnings,
            MigratabilityClass::NotMigratable,
            MigratabilityClass::Migratable,
        ]);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.migratable, 2);
        assert_eq!(counts.migratable_with_warnings, 1);
        assert_eq!(counts.not_migratable, 1);
    }

    #[test]
    fn breakdown_matches_three_vm_scenario() {
        // VM-1: 4 cores / 8 GB, one Warning concern.
        // VM-2: 2 cores / 4 GB, one Critical concern.
        // VM-3: 1 core  / 2 GB, no concerns.
        let samples = [
            (
                VmResources { cpu_cores: 4, ram_gb: 8, ..VmResources::default() },
                MigratabilityClass::MigratableWithWarnings,
            ),
            (
                VmResources { cpu_cores: 2, ram_gb: 4, ..VmResources::default() },
                MigratabilityClass::NotMigratable,
            ),
            (
                VmResources { cpu_cores: 1, ram_gb: 2, ..VmResources::default() },
                MigratabilityClass::Migratable,
            ),
        ];
        let breakdowns = ResourceBreakdowns::from_samples(samples);

        assert_eq!(breakdowns.cpu_cores.total, 7);
        assert_eq!(breakdowns.cpu_cores.total_for_migratable, 5);
        assert_eq!(breakdowns.cpu_cores.total_for_migratable_with_warnings, 4);
        assert_eq!(breakdowns.cpu_cores.total_for_not_migratable, 2);

        assert_eq!(breakdowns.ram_gb.total, 14);
        assert_eq!(breakdowns.ram_gb.total_for_migratable, 10);
        assert_eq!(breakdowns.ram_gb.total_for_migratable_with_warnings, 8);
        assert_eq!(breakdowns.ram_gb.total_for_not_migratable, 4);
    }

    #[test]
    fn breakdown_additive_identity() {
        let samples = [
            (
                VmResources { cpu_cores: 3, ram_gb: 6, disk_count: 2, disk_gb: 100, nic_count: 1 },
                MigratabilityClass::MigratableWithWarnings,
            ),
            (
                VmResources { cpu_cores: 5, ram_gb: 16, disk_count: 1, disk_gb: 40, nic_count: 2 },
                MigratabilityClass::NotMigratable,
            ),
        ];
        let b = ResourceBreakdowns::from_samples(samples);
        for kind in [b.cpu_cores, b.ram_gb, b.disk_count, b.disk_gb, b.nic_count] {
            assert_eq!(kind.total_for_migratable + kind.total_for_not_migratable, kind.total);
        }
    }

    #[test]
    fn total_resources_sums_all_kinds() {
        let totals = TotalResources::from_samples([
            VmResources { cpu_cores: 4, ram_gb: 8, disk_count: 1, disk_gb: 50, nic_count: 2 },
            VmResources { cpu_cores: 2, ram_gb: 4, disk_count: 3, disk_gb: 30, nic_count: 1 },
        ]);
        assert_eq!(totals.total_cpu_cores, 6);
        assert_eq!(totals.total_ram_gb, 12);
        assert_eq!(totals.total_disk_count, 4);
        assert_eq!(totals.total_disk_gb, 80);
        assert_eq!(totals.total_nic_count, 3);
    }
}
