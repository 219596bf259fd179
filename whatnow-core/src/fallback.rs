//! Built-in suggestions shown when none of the user's tasks fit.

use rand::Rng;

use crate::task::{Level, Task};

struct Builtin {
    name: &'static str,
    desc: &'static str,
    kind: &'static str,
    time: u32,
    social: Level,
    energy: Level,
}

const BUILTINS: [Builtin; 12] = [
    Builtin { name: "Go for a short walk", desc: "Fresh air helps clear the mind", kind: "Health", time: 15, social: Level::Low, energy: Level::Low },
    Builtin { name: "Check the post", desc: "Quick and easy win", kind: "Errand", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Hoover one room", desc: "Just one room, not the whole house", kind: "Chores", time: 15, social: Level::Low, energy: Level::Medium },
    Builtin { name: "Do the dishes", desc: "Clear the sink, clear the mind", kind: "Chores", time: 15, social: Level::Low, energy: Level::Low },
    Builtin { name: "Drink a glass of water", desc: "Stay hydrated", kind: "Health", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Stretch for 5 minutes", desc: "Your body will thank you", kind: "Health", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Tidy your desk", desc: "A clear space for a clear mind", kind: "Chores", time: 15, social: Level::Low, energy: Level::Low },
    Builtin { name: "Take out the rubbish", desc: "One less thing to think about", kind: "Chores", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Water the plants", desc: "They need you", kind: "Chores", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Reply to one message", desc: "Just one, you can do it", kind: "Social", time: 5, social: Level::Medium, energy: Level::Low },
    Builtin { name: "Make your bed", desc: "Start with a quick win", kind: "Chores", time: 5, social: Level::Low, energy: Level::Low },
    Builtin { name: "Clear kitchen counter", desc: "Just the counter, nothing else", kind: "Chores", time: 10, social: Level::Low, energy: Level::Low },
];

/// The built-in list as task templates. Ids are empty until surfaced.
pub fn builtin_tasks() -> Vec<Task> {
    BUILTINS
        .iter()
        .map(|b| {
            Task::new("", b.name)
                .with_description(b.desc)
                .with_type(b.kind)
                .with_time(b.time)
                .with_social(b.social)
                .with_energy(b.energy)
        })
        .collect()
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `fallback_` followed by nine random base-36 characters.
pub fn synthetic_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("fallback_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtins_are_low_effort() {
        let tasks = builtin_tasks();
        assert_eq!(tasks.len(), 12);
        assert!(tasks.iter().all(|t| t.energy != Some(Level::High)));
        assert!(tasks.iter().all(|t| t.time.is_some_and(|m| m <= 15)));
    }

    #[test]
    fn synthetic_ids_are_prefixed_and_distinct() {
        let mut rng = rand::thread_rng();
        let ids: HashSet<String> = (0..200).map(|_| synthetic_id(&mut rng)).collect();
        assert_eq!(ids.len(), 200);
        for id in &ids {
            let suffix = id.strip_prefix("fallback_").unwrap();
            assert_eq!(suffix.len(), 9);
            assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
        }
    }
}
