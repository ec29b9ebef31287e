use crate::models::Participant;
use std::collections::{BTreeMap, BTreeSet};

/// Fixed room list per (subject, level). Unknown combinations get no rooms.
pub fn rooms_for(subject: &str, level: &str) -> Vec<&'static str> {
    match (subject, level) {
        ("Matematika", "Level 1") => vec!["Ruang 1 Mekkah", "Ruang 2 Jeddah"],
        ("Matematika", "Level 2") => vec!["Ruang 3 Riyadh", "Ruang 4 Muskat"],
        ("Matematika", "Level 3") => vec!["Ruang 5 Abudhabi", "Ruang 6 Yaman"],
        ("Matematika", "Level 4") | ("Matematika", "Level 5") => vec!["Ruang 7 Sana'a"],
        ("Sains", "Level 1") => vec!["Ruang 4 Muskat"],
        ("Sains", "Level 2") => vec!["Ruang 5 Abudhabi"],
        ("Sains", "Level 3") => vec!["Ruang 6 Yaman", "Ruang 7 Sana'a"],
        ("Sains", "Level 4") => vec!["Ruang 8 Madinah"],
        _ => vec![],
    }
}

/// Assign a room to every filtered row. Rows are grouped by
/// (subject, level) with a stable key; a two-room group is split at the
/// ceiling of half its size, first part to the first room. Output order is
/// exactly the input order; only the room field changes.
pub fn assign_rooms(filtered: &[Participant]) -> Vec<Participant> {
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, p) in filtered.iter().enumerate() {
        let key = (p.bidang.trim().to_string(), p.level.trim().to_string());
        groups.entry(key).or_default().push(idx);
    }

    let mut rows = filtered.to_vec();
    for ((subject, level), indices) in groups {
        let rooms = rooms_for(&subject, &level);
        match rooms.len() {
            1 => {
                for idx in indices {
                    rows[idx].ruang = rooms[0].to_string();
                }
            }
            2 => {
                let half = indices.len().div_ceil(2);
                for (pos, idx) in indices.into_iter().enumerate() {
                    rows[idx].ruang = if pos < half { rooms[0] } else { rooms[1] }.to_string();
                }
            }
            _ => {
                for idx in indices {
                    rows[idx].ruang = String::new();
                }
            }
        }
    }

    rows
}

/// Exact-match room filter applied after assignment; removal only.
pub fn filter_by_room(rows: &[Participant], room: &str) -> Vec<Participant> {
    if room.is_empty() {
        return rows.to_vec();
    }
    rows.iter().filter(|r| r.ruang == room).cloned().collect()
}

/// Sorted distinct assigned rooms (for display menus and the room filter).
pub fn distinct_rooms(rows: &[Participant]) -> Vec<String> {
    let mut rooms = BTreeSet::new();
    for r in rows {
        let name = r.ruang.trim();
        if !name.is_empty() {
            rooms.insert(name.to_string());
        }
    }
    rooms.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(no: i64, level: &str, bidang: &str) -> Participant {
        Participant {
            no,
            name: format!("Peserta {}", no),
            school: "SDIT Nurul Iman".to_string(),
            level: level.to_string(),
            bidang: bidang.to_string(),
            language: "Indonesia".to_string(),
            ruang: String::new(),
        }
    }

    #[test]
    fn two_room_group_splits_at_ceiling_of_half() {
        let rows: Vec<Participant> = (1..=5)
            .map(|no| participant(no, "Level 1", "Matematika"))
            .collect();
        let assigned = assign_rooms(&rows);

        let mekkah: Vec<i64> = assigned
            .iter()
            .filter(|r| r.ruang == "Ruang 1 Mekkah")
            .map(|r| r.no)
            .collect();
        let jeddah: Vec<i64> = assigned
            .iter()
            .filter(|r| r.ruang == "Ruang 2 Jeddah")
            .map(|r| r.no)
            .collect();
        assert_eq!(mekkah, vec![1, 2, 3]);
        assert_eq!(jeddah, vec![4, 5]);
    }

    #[test]
    fn single_room_group_shares_one_room() {
        let rows: Vec<Participant> = (1..=4)
            .map(|no| participant(no, "Level 5", "Matematika"))
            .collect();
        let assigned = assign_rooms(&rows);
        assert!(assigned.iter().all(|r| r.ruang == "Ruang 7 Sana'a"));
    }

    #[test]
    fn unknown_group_gets_empty_rooms() {
        let rows: Vec<Participant> = (1..=3)
            .map(|no| participant(no, "Level 99", "Matematika"))
            .collect();
        let assigned = assign_rooms(&rows);
        assert!(assigned.iter().all(|r| r.ruang.is_empty()));
    }

    #[test]
    fn interleaved_groups_split_by_group_order_without_reordering() {
        // Matematika L1 and Sains L3 rows interleaved in filtered order.
        let rows = vec![
            participant(1, "Level 1", "Matematika"),
            participant(2, "Level 3", "Sains"),
            participant(3, "Level 1", "Matematika"),
            participant(4, "Level 3", "Sains"),
            participant(5, "Level 1", "Matematika"),
        ];
        let assigned = assign_rooms(&rows);

        // Output order equals input order.
        let nos: Vec<i64> = assigned.iter().map(|r| r.no).collect();
        assert_eq!(nos, vec![1, 2, 3, 4, 5]);

        // Matematika L1 has 3 members: 2 to Mekkah, 1 to Jeddah.
        assert_eq!(assigned[0].ruang, "Ruang 1 Mekkah");
        assert_eq!(assigned[2].ruang, "Ruang 1 Mekkah");
        assert_eq!(assigned[4].ruang, "Ruang 2 Jeddah");

        // Sains L3 has 2 members: 1 to Yaman, 1 to Sana'a.
        assert_eq!(assigned[1].ruang, "Ruang 6 Yaman");
        assert_eq!(assigned[3].ruang, "Ruang 7 Sana'a");
    }

    #[test]
    fn room_filter_removes_rows_without_reordering() {
        let rows: Vec<Participant> = (1..=5)
            .map(|no| participant(no, "Level 1", "Matematika"))
            .collect();
        let assigned = assign_rooms(&rows);

        let kept = filter_by_room(&assigned, "Ruang 2 Jeddah");
        let nos: Vec<i64> = kept.iter().map(|r| r.no).collect();
        assert_eq!(nos, vec![4, 5]);

        let all = filter_by_room(&assigned, "");
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn distinct_rooms_are_sorted_and_skip_empty() {
        let mut rows: Vec<Participant> = (1..=5)
            .map(|no| participant(no, "Level 1", "Matematika"))
            .collect();
        rows.push(participant(6, "Level 99", "Sains"));
        let assigned = assign_rooms(&rows);
        assert_eq!(
            distinct_rooms(&assigned),
            vec!["Ruang 1 Mekkah", "Ruang 2 Jeddah"]
        );
    }
}
