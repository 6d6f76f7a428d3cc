/*!
 * Internal RPC channel between services
 *
 * Responsibility:
 * - wire: payloads, endpoint paths, fault body
 * - client: reqwest-based caller + RemoteVerifier / TokenClient
 */

mod client;
pub mod wire;

pub use client::{RemoteVerifier, RpcClient, RpcError, TokenClient};
pub use wire::{GenericReply, RpcFault};
