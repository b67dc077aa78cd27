//! Keyword vocabularies for datasets and task areas.
//!
//! Matching is plain case-insensitive substring containment: no tokenization,
//! no word boundaries. "indetection" matches "detection".

/// Maximum number of datasets reported by [`detect`].
pub const MAX_DATASETS: usize = 8;
/// Maximum number of task labels reported by [`detect_tasks`].
pub const MAX_TASKS: usize = 6;

pub static KNOWN_DATASETS: &[&str] = &[
    "COCO",
    "LVIS",
    "ADE20K",
    "Cityscapes",
    "ScanNet",
    "ImageNet",
    "OpenImages",
    "Pascal VOC",
    "NYUv2",
    "KITTI",
    "GQA",
    "VQAv2",
    "RefCOCO",
    "RefCOCO+",
    "RefCOCOg",
    "Flickr30k",
    "SA-1B",
    "LAION",
    "Objects365",
    "Waymo",
    "nuScenes",
    "COCO-Stuff",
];

/// (lowercase keyword, display label)
pub static TASK_HINTS: &[(&str, &str)] = &[
    ("open-vocabulary", "Open-Vocabulary"),
    ("open vocabulary", "Open-Vocabulary"),
    ("segmentation", "Segmentation"),
    ("detection", "Detection"),
    ("referring", "Referring / Grounding"),
    ("grounding", "Grounding"),
    ("3d", "3D Vision"),
    ("multimodal", "Vision-Language"),
    ("vision-language", "Vision-Language"),
];

/// Vocabulary entries found in `text`, in vocabulary order, original casing,
/// deduplicated, at most [`MAX_DATASETS`].
pub fn detect<S: AsRef<str>>(vocabulary: &[S], text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for term in vocabulary {
        let term = term.as_ref();
        if haystack.contains(&term.to_lowercase()) && !out.iter().any(|t| t == term) {
            out.push(term.to_string());
        }
    }
    out.truncate(MAX_DATASETS);
    out
}

/// Task labels hinted by title, abstract and comments, in hint order,
/// deduplicated by label, at most [`MAX_TASKS`].
pub fn detect_tasks(text: &str, title: &str, comments: &str) -> Vec<String> {
    let haystack = [title, text, comments].join(" ").to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for (keyword, label) in TASK_HINTS {
        if haystack.contains(keyword) && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out.truncate(MAX_TASKS);
    out
}
