//! Tri-state boolean used for optional switches.

/// A boolean switch that distinguishes "never configured" from "configured false".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Flag {
    /// No layer configured the switch
    #[default]
    Unset,
    /// Configured on
    True,
    /// Configured off
    False,
}

impl Flag {
    /// Observable value; `Unset` resolves to `false`.
    pub fn get(&self) -> bool {
        matches!(self, Flag::True)
    }

    /// Whether a layer configured the switch
    pub fn is_set(&self) -> bool {
        !matches!(self, Flag::Unset)
    }

    /// Keep a configured value, otherwise adopt `source`.
    pub fn merge(&mut self, source: Flag) {
        if !self.is_set() {
            *self = source;
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Flag::True } else { Flag::False }
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        value.map(Flag::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_reads_false_but_is_not_set() {
        assert!(!Flag::Unset.get());
        assert!(!Flag::Unset.is_set());
        assert!(!Flag::False.get());
        assert!(Flag::False.is_set());
    }

    #[test]
    fn test_configured_false_wins_over_source_true() {
        let mut flag = Flag::False;
        flag.merge(Flag::True);
        assert_eq!(flag, Flag::False);

        let mut flag = Flag::Unset;
        flag.merge(Flag::True);
        assert_eq!(flag, Flag::True);
    }
}
