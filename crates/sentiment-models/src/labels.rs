use anyhow::Result;
use std::collections::HashMap;

/// A class label with its softmax probability.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Label names indexed by class id, read from a config's `id2label` map.
pub fn label_names(id2label: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut names = vec![None; id2label.len()];

    for (id, label) in id2label {
        let idx: usize = id
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid label id in id2label: {:?}", id))?;
        let slot = names
            .get_mut(idx)
            .ok_or_else(|| anyhow::anyhow!("Label id {} out of range for {} labels", idx, id2label.len()))?;
        *slot = Some(label.clone());
    }

    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| name.ok_or_else(|| anyhow::anyhow!("Missing label for id {}", idx)))
        .collect()
}

/// Pair probabilities with label names, sorted by probability (descending).
///
/// Ties keep class-id order.
pub fn rank_labels(probabilities: &[f32], labels: &[String]) -> Result<Vec<LabelScore>> {
    if probabilities.len() != labels.len() {
        anyhow::bail!(
            "Classifier produced {} scores for {} labels",
            probabilities.len(),
            labels.len()
        );
    }

    let mut ranked: Vec<LabelScore> = labels
        .iter()
        .zip(probabilities)
        .map(|(label, &score)| LabelScore {
            label: label.clone(),
            score,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(ranked)
}
