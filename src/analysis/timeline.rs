use std::fmt;
use std::str::FromStr;

use crate::analysis::types::AnalysisDocument;
use crate::error::ConfigError;

/// Named trigger an animation is timed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Beat,
    /// Alias of `EnergyPeaks`: the analyzer reports bass peaks there
    Bass,
    EnergyPeaks,
    Sections,
    Onsets,
    /// One synthetic event at time 0
    OneTime,
    /// No discrete events; the animation generates its own cadence
    Continuous,
}

impl Trigger {
    pub const ALL: [Trigger; 7] = [
        Trigger::Beat,
        Trigger::Bass,
        Trigger::EnergyPeaks,
        Trigger::Sections,
        Trigger::Onsets,
        Trigger::OneTime,
        Trigger::Continuous,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Trigger::Beat => "beat",
            Trigger::Bass => "bass",
            Trigger::EnergyPeaks => "energy_peaks",
            Trigger::Sections => "sections",
            Trigger::Onsets => "onsets",
            Trigger::OneTime => "one_time",
            Trigger::Continuous => "continuous",
        }
    }

    /// Analysis document category the trigger reads, if any
    pub fn category(self) -> Option<&'static str> {
        match self {
            Trigger::Beat => Some("beats"),
            Trigger::Bass | Trigger::EnergyPeaks => Some("energy_peaks"),
            Trigger::Sections => Some("sections"),
            Trigger::Onsets => Some("onsets"),
            Trigger::OneTime | Trigger::Continuous => None,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trigger {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trigger::ALL
            .into_iter()
            .find(|trigger| trigger.name() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "trigger".to_string(),
                value: s.to_string(),
            })
    }
}

/// Ordered event times for one trigger
#[derive(Debug, Clone, PartialEq)]
pub struct EventTimeline {
    pub trigger: Trigger,

    /// Document category the events came from
    pub category: Option<&'static str>,

    /// Seconds since audio start, in document order
    pub times: Vec<f64>,

    /// The category was requested but absent from the document
    pub missing: bool,
}

impl EventTimeline {
    /// Resolve a trigger against an analysis document
    pub fn resolve(document: &AnalysisDocument, trigger: Trigger) -> Self {
        match trigger {
            Trigger::OneTime => Self {
                trigger,
                category: None,
                times: vec![0.0],
                missing: false,
            },
            Trigger::Continuous => Self {
                trigger,
                category: None,
                times: Vec::new(),
                missing: false,
            },
            _ => {
                let category = trigger.category();
                let times = category.and_then(|name| document.category(name));
                Self {
                    trigger,
                    category,
                    missing: times.is_none(),
                    times: times.unwrap_or_default(),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }
}

/// Map a trigger to its ordered event times; never fails
pub fn extract(document: &AnalysisDocument, trigger: Trigger) -> Vec<f64> {
    EventTimeline::resolve(document, trigger).times
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Section;

    fn document() -> AnalysisDocument {
        AnalysisDocument::default()
            .with_beats(vec![1.0, 2.0, 3.0])
            .with_energy_peaks(vec![4.5])
            .with_sections(vec![
                Section { start: 0.0, end: 10.0, label: None },
                Section { start: 10.0, end: 20.0, label: None },
            ])
    }

    #[test]
    fn test_named_triggers() {
        let doc = document();
        assert_eq!(extract(&doc, Trigger::Beat), vec![1.0, 2.0, 3.0]);
        assert_eq!(extract(&doc, Trigger::EnergyPeaks), vec![4.5]);
        assert_eq!(extract(&doc, Trigger::Sections), vec![0.0, 10.0]);
    }

    #[test]
    fn test_bass_reads_energy_peaks() {
        let doc = document();
        assert_eq!(extract(&doc, Trigger::Bass), extract(&doc, Trigger::EnergyPeaks));
    }

    #[test]
    fn test_pseudo_triggers() {
        let doc = AnalysisDocument::default();
        assert_eq!(extract(&doc, Trigger::OneTime), vec![0.0]);
        assert!(extract(&doc, Trigger::Continuous).is_empty());
        assert!(!EventTimeline::resolve(&doc, Trigger::Continuous).missing);
    }

    #[test]
    fn test_missing_category_is_empty_not_error() {
        let doc = document();
        let timeline = EventTimeline::resolve(&doc, Trigger::Onsets);
        assert!(timeline.is_empty());
        assert!(timeline.missing);
    }

    #[test]
    fn test_present_but_empty_is_not_missing() {
        let doc = AnalysisDocument::default().with_beats(vec![]);
        let timeline = EventTimeline::resolve(&doc, Trigger::Beat);
        assert!(timeline.is_empty());
        assert!(!timeline.missing);
    }

    #[test]
    fn test_trigger_vocabulary() {
        assert_eq!("energy_peaks".parse::<Trigger>().unwrap(), Trigger::EnergyPeaks);
        assert_eq!("one_time".parse::<Trigger>().unwrap(), Trigger::OneTime);
        assert!("treble".parse::<Trigger>().is_err());
    }
}
