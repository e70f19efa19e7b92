use serde::Serialize;
use std::path::Path;

/// The four chart slots a song can ship with.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Opening,
    Middle,
    Finale,
    Encore,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Opening,
        Difficulty::Middle,
        Difficulty::Finale,
        Difficulty::Encore,
    ];

    /// 1-based level, which is also the index of the song's difficulty tuple.
    pub fn level(self) -> usize {
        match self {
            Difficulty::Opening => 1,
            Difficulty::Middle => 2,
            Difficulty::Finale => 3,
            Difficulty::Encore => 4,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Difficulty::Opening => "OP",
            Difficulty::Middle => "MD",
            Difficulty::Finale => "FN",
            Difficulty::Encore => "EC",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            Difficulty::Opening => "OPENING",
            Difficulty::Middle => "MIDDLE",
            Difficulty::Finale => "FINALE",
            Difficulty::Encore => "ENCORE",
        }
    }

    /// Resolve the slot from a chart path like `Charts/0042/FINALE.vsb`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|d| d.file_stem().eq_ignore_ascii_case(stem))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_from_chart_file_name() {
        assert_eq!(
            Difficulty::from_path(Path::new("Charts/0042/FINALE.vsb")),
            Some(Difficulty::Finale)
        );
        assert_eq!(
            Difficulty::from_path(Path::new("encore.vsb")),
            Some(Difficulty::Encore)
        );
        assert_eq!(Difficulty::from_path(Path::new("EXTRA.vsb")), None);
    }

    #[test]
    fn levels_follow_slot_order() {
        let levels: Vec<_> = Difficulty::ALL.iter().map(|d| d.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(Difficulty::Middle.abbreviation(), "MD");
    }
}
