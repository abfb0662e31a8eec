use std::collections::HashSet;
use reporec::SimilarityTable;

/// Precision and recall of approximate neighbor lists against exact ones.
pub struct Metrics {
    precisions: Vec<f64>,
    recalls: Vec<f64>,
    fscores: Vec<f64>,
}

#[derive(Debug)]
pub struct MetricResult {
    pub precision: f64,
    pub recall: f64,
    pub fscore: f64,
    pub compared: usize,
}

fn fscore(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

fn mean(list: &[f64]) -> f64 {
    if list.is_empty() {
        return 0.0;
    }
    list.iter().sum::<f64>() / (list.len() as f64)
}

impl Metrics {

    pub fn new() -> Self {
        Metrics { precisions: Vec::new(), recalls: Vec::new(), fscores: Vec::new() }
    }

    pub fn update_metrics(&mut self, found: &HashSet<&str>, reference: &HashSet<&str>) {
        if found.is_empty() && reference.is_empty() {
            return;
        }
        let intersection = reference.iter().filter(|id| found.contains(*id)).count() as f64;
        let precision = if found.is_empty() { 0.0 } else { intersection / found.len() as f64 };
        let recall = if reference.is_empty() { 1.0 } else { intersection / reference.len() as f64 };

        self.precisions.push(precision);
        self.recalls.push(recall);
        self.fscores.push(fscore(precision, recall));
    }

    /// Compares the neighbor ids of every entity in `exact`.
    pub fn compare_tables(&mut self, approximate: &SimilarityTable, exact: &SimilarityTable) {
        for (entity, reference) in exact.iter() {
            let reference: HashSet<&str> = reference.iter().map(|m| m.id.as_str()).collect();
            let found: HashSet<&str> = approximate.get(entity)
                .map(|matches| matches.iter().map(|m| m.id.as_str()).collect())
                .unwrap_or_default();
            self.update_metrics(&found, &reference);
        }
    }

    pub fn get_result(&self) -> MetricResult {
        MetricResult {
            precision: mean(&self.precisions),
            recall: mean(&self.recalls),
            fscore: mean(&self.fscores),
            compared: self.precisions.len(),
        }
    }

}
