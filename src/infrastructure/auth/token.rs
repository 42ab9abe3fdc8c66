use rand::{distributions::Slice, Rng};

const TOKEN_LENGTH: usize = 32;
const BASE36: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j',
    'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't',
    'u', 'v', 'w', 'x', 'y', 'z',
];

/// Opaque session token: 32 base-36 characters from the thread-local
/// CSPRNG. The source derived these from `Math.random`; the shape is
/// kept, the generator is not.
pub fn generate_session_token() -> String {
    let alphabet = Slice::new(&BASE36).expect("alphabet is non-empty");
    rand::thread_rng()
        .sample_iter(alphabet)
        .take(TOKEN_LENGTH)
        .collect()
}
