use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

/// 集計対象外とするプロジェクト名のルール。
///
/// どちらのルールも大文字小文字を区別せずに評価する。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExclusionRule {
    /// 正規表現によるルール。`.*lab.*`のようにワイルドカードを含められる。
    Wildcard(String),
    /// プロジェクト名そのものを指定するルール。
    Literal(String),
}

impl ExclusionRule {
    pub fn wildcard(pattern: &str) -> Self {
        Self::Wildcard(pattern.to_string())
    }

    pub fn literal(name: &str) -> Self {
        Self::Literal(name.to_string())
    }
}

/// ルールをプロジェクト名のどこまでに一致させるか。
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Anchoring {
    /// プロジェクト名全体に一致した場合のみ除外する。
    Full,
    /// 先頭から一致すれば除外する。末尾のアンカーを持たない旧来の挙動。
    Start,
}

#[derive(Debug)]
enum Matcher {
    Pattern(Regex),
    Literal(String),
}

/// コンパイル済みの除外ルールの集合。
#[derive(Debug)]
pub struct ExclusionFilter {
    matchers: Vec<Matcher>,
    anchoring: Anchoring,
}

impl ExclusionFilter {
    /// 新しい`ExclusionFilter`を返す。
    ///
    /// 正規表現として解釈できないルールが含まれる場合はエラーを返す。
    ///
    /// # Arguments
    ///
    /// * `rules` - 除外ルール
    /// * `anchoring` - ルールの一致範囲
    pub fn new(rules: &[ExclusionRule], anchoring: Anchoring) -> Result<Self> {
        let matchers = rules
            .iter()
            .map(|rule| match rule {
                ExclusionRule::Wildcard(pattern) => {
                    let anchored = match anchoring {
                        Anchoring::Full => format!("^(?:{})$", pattern),
                        Anchoring::Start => format!("^(?:{})", pattern),
                    };
                    RegexBuilder::new(&anchored)
                        .case_insensitive(true)
                        .build()
                        .map(Matcher::Pattern)
                        .with_context(|| format!("Invalid exclusion pattern: {}", pattern))
                }
                ExclusionRule::Literal(name) => Ok(Matcher::Literal(name.to_lowercase())),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            matchers,
            anchoring,
        })
    }

    /// プロジェクト名がいずれかのルールに一致するかを返す。
    pub fn is_excluded(&self, project: &str) -> bool {
        let lowered = project.to_lowercase();
        self.matchers.iter().any(|matcher| match matcher {
            Matcher::Pattern(regex) => regex.is_match(project),
            Matcher::Literal(name) => match self.anchoring {
                Anchoring::Full => lowered == *name,
                Anchoring::Start => lowered.starts_with(name.as_str()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Anchoring, ExclusionFilter, ExclusionRule};

    fn rules() -> Vec<ExclusionRule> {
        vec![
            ExclusionRule::wildcard(".*lab.*"),
            ExclusionRule::wildcard("proiect.*"),
            ExclusionRule::literal("copilot"),
            ExclusionRule::literal("Unknown Project"),
        ]
    }

    #[rstest]
    #[case::wildcard_infix("mylab2", true)]
    #[case::wildcard_case_insensitive("LAB1", true)]
    #[case::wildcard_prefix("Proiect-PA", true)]
    #[case::prefix_rule_not_infix("my-proiect", false)]
    #[case::literal("copilot", true)]
    #[case::literal_case_insensitive("COPILOT", true)]
    #[case::literal_with_space("unknown project", true)]
    #[case::literal_longer_name("copilot-chat", false)]
    #[case::unrelated("Work", false)]
    #[case::empty("", false)]
    fn test_is_excluded_full(#[case] project: &str, #[case] expected: bool) {
        let filter = ExclusionFilter::new(&rules(), Anchoring::Full).unwrap();

        assert_eq!(filter.is_excluded(project), expected);
    }

    /// 先頭一致のみの場合は、リテラルルールが前方一致として振る舞う。
    #[rstest]
    #[case::literal_longer_name("copilot-chat", true)]
    #[case::literal("Copilot", true)]
    #[case::prefix_rule_not_infix("my-proiect", false)]
    #[case::unrelated("Work", false)]
    fn test_is_excluded_start(#[case] project: &str, #[case] expected: bool) {
        let filter = ExclusionFilter::new(&rules(), Anchoring::Start).unwrap();

        assert_eq!(filter.is_excluded(project), expected);
    }

    /// 2つの一致範囲で結果が異なる名前があることを確認する。
    #[test]
    fn test_anchoring_discrepancy() {
        let rules = vec![
            ExclusionRule::literal("rust_os"),
            ExclusionRule::wildcard("didi"),
        ];
        let full = ExclusionFilter::new(&rules, Anchoring::Full).unwrap();
        let start = ExclusionFilter::new(&rules, Anchoring::Start).unwrap();

        for project in ["rust_os_v2", "didier"] {
            assert!(!full.is_excluded(project), "{} excluded by full", project);
            assert!(start.is_excluded(project), "{} kept by start", project);
        }
        for project in ["rust_os", "DIDI"] {
            assert!(full.is_excluded(project));
            assert!(start.is_excluded(project));
        }
    }

    #[test]
    fn test_no_rules() {
        let filter = ExclusionFilter::new(&[], Anchoring::Full).unwrap();

        assert!(!filter.is_excluded("anything"));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = ExclusionFilter::new(&[ExclusionRule::wildcard("(unclosed")], Anchoring::Full);

        assert!(result.is_err());
    }
}
