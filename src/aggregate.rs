use std::collections::HashMap;

use crate::exclusion::ExclusionFilter;

/// ソースサービスから取得した1件の作業時間。
#[derive(Clone, Debug, PartialEq)]
pub struct ActivitySample {
    pub project: String,
    /// 作業時間(秒)。
    pub duration: f64,
    /// 作業開始時刻(unix time)。
    pub time: Option<f64>,
}

/// プロジェクトごとの合計時間。
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectTotal {
    pub project: String,
    pub total_seconds: f64,
}

/// 除外ルールに一致しないサンプルのみを返す。
pub fn retain_included(
    samples: &[ActivitySample],
    filter: &ExclusionFilter,
) -> Vec<ActivitySample> {
    samples
        .iter()
        .filter(|sample| !filter.is_excluded(&sample.project))
        .cloned()
        .collect()
}

/// 除外ルールに一致しないサンプルをプロジェクトごとに合計する。
///
/// 結果は各プロジェクトが最初に現れた順に並ぶ。
/// 対象のサンプルが1件もないプロジェクトは結果に含まれない。
pub fn aggregate(samples: &[ActivitySample], filter: &ExclusionFilter) -> Vec<ProjectTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ProjectTotal> = Vec::new();

    samples
        .iter()
        .filter(|sample| !filter.is_excluded(&sample.project))
        .for_each(|sample| match index.get(sample.project.as_str()) {
            Some(&position) => totals[position].total_seconds += sample.duration,
            None => {
                index.insert(sample.project.as_str(), totals.len());
                totals.push(ProjectTotal {
                    project: sample.project.clone(),
                    total_seconds: sample.duration,
                });
            }
        });

    totals
}
