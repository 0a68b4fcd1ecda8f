//! netbreach on-chain: a PolkaVM verifier contract
//!
//! Runs the netbreach engine as a smart contract on Polkadot's AssetHub via
//! pallet-revive + PolkaVM. Each contract instance holds one game session;
//! every submitted turn is resolved on chain and must reproduce the state
//! hash the client claims.
//!
//! ## Contract API (Solidity-style selectors)
//!
//! | Function     | Signature                    | Description                          |
//! |--------------|------------------------------|--------------------------------------|
//! | newGame      | newGame(bytes32,bytes)       | Start a game from seed + encounter   |
//! | resolveTurn  | resolveTurn(bytes,bytes32)   | Resolve assignments, check the claim |
//! | getStateHash | getStateHash()               | Commitment of the stored state       |
//! | getState     | getState()                   | Postcard-encoded game state          |
//!
//! `newGame` takes the encounter as postcard bytes; `resolveTurn` takes the
//! fixed 6-byte assignment records of `nb_core::wire`.

#![no_main]
#![no_std]

extern crate alloc;

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use polkavm_derive::polkavm_export;
use simplealloc::SimpleAlloc;
use uapi::{HostFn, HostFnImpl as api, ReturnFlags, StorageFlags};

use nb_core::seed::keccak256;
use nb_core::wire::{abi_bytes, abi_word, decode_assignments};
use nb_core::{Encounter, GameState, RoundResult, Seed, StateHash, resolve_turn};

// ---------------------------------------------------------------------------
// Allocator: 128 KB heap; a game state is a few hundred bytes
// ---------------------------------------------------------------------------

#[global_allocator]
static ALLOCATOR: SimpleAlloc<{ 128 * 1024 }> = SimpleAlloc::new();

// ---------------------------------------------------------------------------
// Panic handler: trap on panic in contract context
// ---------------------------------------------------------------------------

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

// ---------------------------------------------------------------------------
// Storage keys (32-byte)
// ---------------------------------------------------------------------------

/// Postcard-encoded `GameState`
const KEY_GAME_STATE: [u8; 32] = [0u8; 32];

/// Deployer address; the only account allowed to start games
const KEY_OWNER: [u8; 32] = {
    let mut k = [0u8; 32];
    k[0] = 1;
    k
};

/// Commitment of the stored state
const KEY_STATE_HASH: [u8; 32] = {
    let mut k = [0u8; 32];
    k[0] = 2;
    k
};

const MAX_INPUT: usize = 4096;
const MAX_STATE: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Function selectors: keccak256(signature)[0..4]
// ---------------------------------------------------------------------------

const SIG_NEW_GAME: &[u8] = b"newGame(bytes32,bytes)";
const SIG_RESOLVE_TURN: &[u8] = b"resolveTurn(bytes,bytes32)";
const SIG_GET_STATE_HASH: &[u8] = b"getStateHash()";
const SIG_GET_STATE: &[u8] = b"getState()";

fn selector(signature: &[u8]) -> [u8; 4] {
    let hash = keccak256(&[signature]);
    [hash[0], hash[1], hash[2], hash[3]]
}

// ---------------------------------------------------------------------------
// Contract entry points
// ---------------------------------------------------------------------------

/// Called once when the contract is deployed.
/// Stores the deployer's address as the contract owner.
#[polkavm_export]
pub extern "C" fn deploy() {
    let mut caller = [0u8; 20];
    api::caller(&mut caller);
    api::set_storage(StorageFlags::empty(), &KEY_OWNER, &caller);
}

/// Called on every transaction to the contract.
/// Dispatches based on the 4-byte function selector.
#[polkavm_export]
pub extern "C" fn call() {
    let mut input_buf = [0u8; MAX_INPUT];
    api::input(&mut input_buf);

    let head = [input_buf[0], input_buf[1], input_buf[2], input_buf[3]];
    let data = &input_buf[4..];

    let result = if head == selector(SIG_NEW_GAME) {
        handle_new_game(data)
    } else if head == selector(SIG_RESOLVE_TURN) {
        handle_resolve_turn(data)
    } else if head == selector(SIG_GET_STATE_HASH) {
        handle_get_state_hash()
    } else if head == selector(SIG_GET_STATE) {
        handle_get_state()
    } else {
        Err(Vec::from(&b"unknown selector"[..]))
    };

    match result {
        Ok(output) => api::return_value(ReturnFlags::empty(), &output),
        Err(reason) => api::return_value(ReturnFlags::REVERT, &reason),
    }
}

/// Revert reason
type Revert = Vec<u8>;

fn revert(reason: &str) -> Revert {
    Vec::from(reason.as_bytes())
}

fn word(data: &[u8], index: usize) -> Result<&[u8], Revert> {
    abi_word(data, index).map_err(|e| revert(&format!("{}", e)))
}

fn dynamic_bytes(data: &[u8], index: usize) -> Result<&[u8], Revert> {
    abi_bytes(data, index).map_err(|e| revert(&format!("{}", e)))
}

// ---------------------------------------------------------------------------
// Handler: newGame(bytes32 seed, bytes encounter)
// ---------------------------------------------------------------------------

fn handle_new_game(data: &[u8]) -> Result<Vec<u8>, Revert> {
    let mut caller = [0u8; 20];
    api::caller(&mut caller);
    let mut owner = [0u8; 20];
    let mut owner_out = &mut owner[..];
    api::get_storage(StorageFlags::empty(), &KEY_OWNER, &mut owner_out)
        .map_err(|_| revert("no owner"))?;
    if caller != owner {
        return Err(revert("only the owner starts games"));
    }

    let seed = Seed::from_slice(word(data, 0)?).map_err(|e| revert(&format!("{}", e)))?;
    let encounter: Encounter =
        postcard::from_bytes(dynamic_bytes(data, 1)?).map_err(|_| revert("bad encounter"))?;

    let state = GameState::start(encounter, seed).map_err(|e| revert(&format!("{}", e)))?;
    let hash = store_state(&state)?;
    Ok(Vec::from(&hash.as_bytes()[..]))
}

// ---------------------------------------------------------------------------
// Handler: resolveTurn(bytes assignments, bytes32 claimedHash)
// ---------------------------------------------------------------------------

fn handle_resolve_turn(data: &[u8]) -> Result<Vec<u8>, Revert> {
    let records = dynamic_bytes(data, 0)?;
    let mut claimed = [0u8; 32];
    claimed.copy_from_slice(word(data, 1)?);
    let claimed = StateHash::from_bytes(claimed);

    let state = load_state()?;
    let assignments = decode_assignments(records).map_err(|e| revert(&format!("{}", e)))?;
    let outcome = resolve_turn(&state, &assignments).map_err(|e| revert(&format!("{}", e)))?;
    if outcome.hash != claimed {
        return Err(revert(&format!(
            "commitment mismatch: claimed {}, computed {}",
            claimed, outcome.hash
        )));
    }

    let next = if outcome.state.status.is_active() {
        outcome.state.deal().map_err(|e| revert(&format!("{}", e)))?
    } else {
        outcome.state
    };
    store_state(&next)?;

    // hash word followed by the result as a uint8 word
    let mut output = vec![0u8; 64];
    output[..32].copy_from_slice(outcome.hash.as_bytes());
    output[63] = match outcome.result {
        RoundResult::Continue => 0,
        RoundResult::Victory => 1,
        RoundResult::Defeat => 2,
    };
    Ok(output)
}

// ---------------------------------------------------------------------------
// Read-only handlers
// ---------------------------------------------------------------------------

fn handle_get_state_hash() -> Result<Vec<u8>, Revert> {
    let mut hash = [0u8; 32];
    let mut out = &mut hash[..];
    api::get_storage(StorageFlags::empty(), &KEY_STATE_HASH, &mut out)
        .map_err(|_| revert("no game state"))?;
    Ok(Vec::from(&hash[..]))
}

fn handle_get_state() -> Result<Vec<u8>, Revert> {
    load_state_bytes()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_state_bytes() -> Result<Vec<u8>, Revert> {
    let mut buf = vec![0u8; MAX_STATE];
    let mut out = &mut buf[..];
    api::get_storage(StorageFlags::empty(), &KEY_GAME_STATE, &mut out)
        .map_err(|_| revert("no game state"))?;
    let len = out.len();
    buf.truncate(len);
    Ok(buf)
}

fn load_state() -> Result<GameState, Revert> {
    let bytes = load_state_bytes()?;
    postcard::from_bytes(&bytes).map_err(|_| revert("corrupt game state"))
}

/// Persist a state and its commitment; returns the commitment
fn store_state(state: &GameState) -> Result<StateHash, Revert> {
    let bytes = postcard::to_allocvec(state).map_err(|_| revert("state serialization failed"))?;
    let hash = state.state_hash();
    api::set_storage(StorageFlags::empty(), &KEY_GAME_STATE, &bytes);
    api::set_storage(StorageFlags::empty(), &KEY_STATE_HASH, hash.as_bytes());
    Ok(hash)
}
