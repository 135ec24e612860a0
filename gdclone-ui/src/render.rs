use gdclone_core::{ItemKind, ProgressSnapshot, ResolvedItem};

/// Badge strings for a resolved item, matching the info card of the web
/// front end: kind, item count for folders, size unless unknown.
pub fn badges(item: &ResolvedItem) -> Vec<String> {
    let mut badges = vec![
        match item.kind {
            ItemKind::Folder => "Folder".to_string(),
            ItemKind::File => "File".to_string(),
        },
    ];
    if let Some(count) = item.item_count {
        badges.push(format!("{count} items"));
    }
    if item.size != "Unknown" {
        badges.push(format!("{} bytes", item.size));
    }
    badges
}

pub fn describe_resolved(item: &ResolvedItem) -> String {
    format!("{} [{}]", item.name, badges(item).join(", "))
}

pub fn progress_line(snapshot: &ProgressSnapshot) -> String {
    let mut line = format!(
        "{}: {:.0}% ({} of {} items)",
        snapshot.status, snapshot.percentage, snapshot.completed, snapshot.total
    );
    if let Some(current) = &snapshot.current_file {
        line.push_str(&format!(", processing {current}"));
    }
    if !snapshot.errors.is_empty() {
        line.push_str(&format!(", {} errors", snapshot.errors.len()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdclone_core::TaskStatus;

    fn folder_item() -> ResolvedItem {
        ResolvedItem {
            id: "ABC123".to_string(),
            name: "My Folder".to_string(),
            kind: ItemKind::Folder,
            size: "Unknown".to_string(),
            item_count: Some(5),
        }
    }

    #[test]
    fn folder_with_unknown_size_gets_kind_and_count_badges() {
        assert_eq!(badges(&folder_item()), vec!["Folder", "5 items"]);
    }

    #[test]
    fn file_with_size_gets_kind_and_size_badges() {
        let item = ResolvedItem {
            id: "F1".to_string(),
            name: "Notes.txt".to_string(),
            kind: ItemKind::File,
            size: "2048".to_string(),
            item_count: None,
        };
        assert_eq!(badges(&item), vec!["File", "2048 bytes"]);
    }

    #[test]
    fn describe_resolved_includes_name_and_badges() {
        assert_eq!(describe_resolved(&folder_item()), "My Folder [Folder, 5 items]");
    }

    #[test]
    fn progress_line_includes_counts_and_current_file() {
        let snapshot = ProgressSnapshot {
            status: TaskStatus::new("cloning"),
            percentage: 40.0,
            completed: 2,
            total: 5,
            current_file: Some("Report.pdf".to_string()),
            errors: Vec::new(),
            result: None,
        };
        assert_eq!(
            progress_line(&snapshot),
            "cloning: 40% (2 of 5 items), processing Report.pdf"
        );
    }

    #[test]
    fn progress_line_counts_errors() {
        let mut snapshot = ProgressSnapshot::starting();
        snapshot.errors.push("Error copying file X".to_string());
        assert_eq!(
            progress_line(&snapshot),
            "starting: 0% (0 of 0 items), 1 errors"
        );
    }
}
