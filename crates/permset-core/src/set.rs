//! Permissioned whitelist/blacklist updated through delegated signatures.
//!
//! The instance never accepts membership changes from its callers directly.
//! A caller (the relayer) submits the replacement lists together with a
//! signature by the authority over an EIP-712 `permission` message naming
//! that caller. The instance re-derives the digest from what was actually
//! submitted, recovers the signer and applies the lists only if the signer
//! is the authority:
//!
//! 1. Build `permission { _caller, _whitelist, _blacklist }` from the call
//! 2. Hash it under the instance's domain
//! 3. Recover the signer (malformed signatures are rejected here)
//! 4. Compare the signer with the authority
//! 5. Shape the lists with the membership policy
//! 6. Replace both lists and publish `MembershipChanged`
//!
//! Any failure leaves both lists untouched.

use alloy_primitives::{Address, B256};
use permset_auth::{AccessController, Secp256k1Verifier, SignatureVerifier};
use permset_types::utils::compute_final_digest;
use permset_types::{DomainContext, PermissionEvent, PermissionRequest, SignatureParts};
use serde::{Deserialize, Serialize};

use crate::chain::ChainContext;
use crate::error::PermissionError;
use crate::event_bus::EventBus;
use crate::policy::MembershipPolicy;

/// Lists stored by a successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipUpdate {
	pub whitelist: Vec<Address>,
	pub blacklist: Vec<Address>,
}

/// Whitelist and blacklist controlled by a single signing authority.
pub struct PermissionedSet {
	domain: DomainContext,
	/// Cached separator of `domain`, which never changes.
	domain_separator: B256,
	access: AccessController,
	policy: MembershipPolicy,
	verifier: Box<dyn SignatureVerifier>,
	events: Option<EventBus>,
	whitelist: Vec<Address>,
	blacklist: Vec<Address>,
}

impl PermissionedSet {
	/// Creates an empty set deployed at `chain`, authorizing updates signed
	/// by `authority`.
	pub fn new(chain: &ChainContext, name: impl Into<String>, authority: Address) -> Self {
		let domain = DomainContext::new(name, chain.chain_id, chain.address);
		let domain_separator = domain.separator();

		tracing::debug!(
			instance = %chain.address,
			chain_id = chain.chain_id,
			authority = %authority,
			name = %domain.name,
			"Created permissioned set"
		);

		Self {
			domain,
			domain_separator,
			access: AccessController::new(authority),
			policy: MembershipPolicy::default(),
			verifier: Box::new(Secp256k1Verifier),
			events: None,
			whitelist: Vec::new(),
			blacklist: Vec::new(),
		}
	}

	/// Sets how submitted lists are stored.
	pub fn with_policy(mut self, policy: MembershipPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Replaces the signature verifier.
	pub fn with_verifier(mut self, verifier: Box<dyn SignatureVerifier>) -> Self {
		self.verifier = verifier;
		self
	}

	/// Publishes membership events to `events`.
	pub fn with_event_bus(mut self, events: EventBus) -> Self {
		self.events = Some(events);
		self
	}

	/// Current whitelist, in stored order.
	pub fn whitelist(&self) -> &[Address] {
		&self.whitelist
	}

	/// Current blacklist, in stored order.
	pub fn blacklist(&self) -> &[Address] {
		&self.blacklist
	}

	pub fn is_whitelisted(&self, address: &Address) -> bool {
		self.whitelist.contains(address)
	}

	pub fn is_blacklisted(&self, address: &Address) -> bool {
		self.blacklist.contains(address)
	}

	/// The only identity whose signatures are accepted.
	pub fn authority(&self) -> Address {
		self.access.authority()
	}

	/// Address of this instance, the domain's verifying contract.
	pub fn address(&self) -> Address {
		self.domain.verifying_contract
	}

	pub fn domain(&self) -> &DomainContext {
		&self.domain
	}

	pub fn domain_separator(&self) -> B256 {
		self.domain_separator
	}

	pub fn policy(&self) -> MembershipPolicy {
		self.policy
	}

	/// Digest the authority must sign for `caller` to submit these lists.
	pub fn digest_for(
		&self,
		caller: Address,
		whitelist: &[Address],
		blacklist: &[Address],
	) -> B256 {
		let request = PermissionRequest::new(caller, whitelist.to_vec(), blacklist.to_vec());
		self.request_digest(&request)
	}

	fn request_digest(&self, request: &PermissionRequest) -> B256 {
		compute_final_digest(&self.domain_separator, &request.struct_hash())
	}

	/// Replaces both lists if `signature` is the authority's signature over
	/// `permission { caller, whitelist, blacklist }` under this instance's
	/// domain.
	///
	/// `caller` is the account invoking the update. It is part of the signed
	/// message, so a signature issued to one relayer does not verify when
	/// submitted by another.
	///
	/// # Errors
	///
	/// - [`PermissionError::InvalidSignature`] if no signer can be recovered
	/// - [`PermissionError::Unauthorized`] if the signer is not the authority,
	///   which includes any signature over different lists or caller
	/// - [`PermissionError::InvalidMembership`] if the strict policy refuses
	///   the lists
	///
	/// Returns the lists as stored, after the membership policy.
	///
	/// On error the whitelist and blacklist are unchanged.
	pub fn delegated_set(
		&mut self,
		caller: Address,
		whitelist: Vec<Address>,
		blacklist: Vec<Address>,
		signature: &SignatureParts,
	) -> Result<MembershipUpdate, PermissionError> {
		let request = PermissionRequest::new(caller, whitelist, blacklist);

		match self.authorize_update(request, signature) {
			Ok((whitelist, blacklist)) => {
				self.whitelist = whitelist;
				self.blacklist = blacklist;

				tracing::info!(
					instance = %self.address(),
					caller = %caller,
					whitelist_len = self.whitelist.len(),
					blacklist_len = self.blacklist.len(),
					"Membership updated"
				);

				self.publish(PermissionEvent::MembershipChanged {
					instance: self.address(),
					whitelist: self.whitelist.clone(),
					blacklist: self.blacklist.clone(),
				});
				Ok(MembershipUpdate {
					whitelist: self.whitelist.clone(),
					blacklist: self.blacklist.clone(),
				})
			},
			Err(err) => {
				tracing::warn!(
					instance = %self.address(),
					caller = %caller,
					error = %err,
					"Rejected delegated update"
				);

				self.publish(PermissionEvent::UpdateRejected {
					instance: self.address(),
					caller,
					reason: err.to_string(),
				});
				Err(err)
			},
		}
	}

	/// Checks a request without touching state and returns the lists to store.
	fn authorize_update(
		&self,
		request: PermissionRequest,
		signature: &SignatureParts,
	) -> Result<(Vec<Address>, Vec<Address>), PermissionError> {
		let digest = self.request_digest(&request);
		tracing::debug!(instance = %self.address(), digest = %digest, "Verifying delegated update");

		let signer = self.verifier.recover(&digest, signature)?;
		self.access.ensure_authorized(&signer)?;

		self.policy.apply(request.whitelist, request.blacklist)
	}

	fn publish(&self, event: PermissionEvent) {
		if let Some(events) = &self.events {
			// No subscribers is not the caller's problem.
			let _ = events.publish(event);
		}
	}
}

impl std::fmt::Debug for PermissionedSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PermissionedSet")
			.field("domain", &self.domain)
			.field("authority", &self.access.authority())
			.field("policy", &self.policy)
			.field("whitelist", &self.whitelist)
			.field("blacklist", &self.blacklist)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, keccak256};
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;
	use mockall::predicate::always;
	use permset_auth::{AuthError, MockSignatureVerifier};
	use permset_types::typed_data_digest;

	// Anvil default accounts #0, #1, #2.
	const ALICE: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const BOB: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
	const CAROL: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
	const DEV: Address = address!("90F79bf6EB2c4f870365E785982E1f101E93b906");

	const BOB_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
	const CAROL_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

	fn signer(key: &str) -> PrivateKeySigner {
		key.parse().unwrap()
	}

	fn wedding() -> PermissionedSet {
		PermissionedSet::new(&ChainContext::deploy(31337, DEV, 0), "Wedding", CAROL)
	}

	/// Signs `permission { caller, whitelist, blacklist }` for `set`, the way
	/// an off-chain typed-data signer would.
	fn sign_for(
		set: &PermissionedSet,
		key: &str,
		caller: Address,
		whitelist: &[Address],
		blacklist: &[Address],
	) -> SignatureParts {
		let request = PermissionRequest::new(caller, whitelist.to_vec(), blacklist.to_vec());
		let digest = typed_data_digest(set.domain(), &request);
		signer(key).sign_hash_sync(&digest).unwrap().into()
	}

	#[test]
	fn test_new_instance_is_empty_and_bound_to_chain() {
		let set = wedding();

		assert!(set.whitelist().is_empty());
		assert!(set.blacklist().is_empty());
		assert_eq!(set.authority(), CAROL);
		assert_eq!(set.policy(), MembershipPolicy::Preserve);

		let domain = set.domain();
		assert_eq!(domain.name, "Wedding");
		assert_eq!(domain.version, "1");
		assert_eq!(domain.chain_id, 31337);
		assert_eq!(domain.verifying_contract, DEV.create(0));
		assert_eq!(set.address(), DEV.create(0));
		assert_eq!(set.domain_separator(), domain.separator());
	}

	#[test]
	fn test_authority_adds_one_address_to_whitelist() {
		let mut set = wedding();
		assert_eq!(set.whitelist().len(), 0);

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[]);
		set.delegated_set(CAROL, vec![ALICE], vec![], &signature)
			.unwrap();

		assert_eq!(set.whitelist().len(), 1);
		assert_eq!(set.whitelist()[0], ALICE);
		assert_eq!(set.blacklist().len(), 0);
		assert!(set.is_whitelisted(&ALICE));
		assert!(!set.is_blacklisted(&ALICE));
	}

	#[test]
	fn test_non_authority_signature_is_unauthorized() {
		let mut set = wedding();

		let signature = sign_for(&set, BOB_KEY, CAROL, &[ALICE], &[]);
		let result = set.delegated_set(CAROL, vec![ALICE], vec![], &signature);

		assert_eq!(result, Err(PermissionError::Unauthorized { signer: BOB }));
		assert_eq!(set.whitelist().len(), 0);
	}

	#[test]
	fn test_substituted_payload_is_rejected() {
		let mut set = wedding();

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[]);
		let result = set.delegated_set(CAROL, vec![BOB], vec![], &signature);

		assert!(matches!(
			result,
			Err(PermissionError::Unauthorized { .. } | PermissionError::InvalidSignature)
		));
		assert!(set.whitelist().is_empty());
		assert!(set.blacklist().is_empty());
	}

	#[test]
	fn test_signature_is_bound_to_caller() {
		let mut set = wedding();

		// Carol authorizes herself as the submitter; Bob relays it instead.
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[]);
		let result = set.delegated_set(BOB, vec![ALICE], vec![], &signature);

		assert!(result.is_err());
		assert!(set.whitelist().is_empty());

		// A signature naming Bob lets Bob relay.
		let signature = sign_for(&set, CAROL_KEY, BOB, &[ALICE], &[]);
		set.delegated_set(BOB, vec![ALICE], vec![], &signature)
			.unwrap();
		assert_eq!(set.whitelist(), &[ALICE]);
	}

	#[test]
	fn test_signature_for_other_instance_is_rejected() {
		let mut set = wedding();
		let other = PermissionedSet::new(&ChainContext::deploy(31337, DEV, 1), "Wedding", CAROL);

		let signature = sign_for(&other, CAROL_KEY, CAROL, &[ALICE], &[]);
		let result = set.delegated_set(CAROL, vec![ALICE], vec![], &signature);

		assert!(result.is_err());
		assert!(set.whitelist().is_empty());
	}

	#[test]
	fn test_tampered_signature_never_succeeds() {
		let mut set = wedding();
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[BOB]);

		let packed = signature.to_bytes();
		for index in 0..packed.len() {
			let mut bytes = packed;
			bytes[index] ^= 0x01;
			let tampered = SignatureParts::from_bytes(&bytes).unwrap();

			let result = set.delegated_set(CAROL, vec![ALICE], vec![BOB], &tampered);
			assert!(
				matches!(
					result,
					Err(PermissionError::InvalidSignature | PermissionError::Unauthorized { .. })
				),
				"tampered byte {index} was accepted"
			);
			assert!(set.whitelist().is_empty());
			assert!(set.blacklist().is_empty());
		}
	}

	#[test]
	fn test_invalid_recovery_parameter_is_invalid_signature() {
		let mut set = wedding();
		let mut signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[]);
		signature.v = 29;

		let result = set.delegated_set(CAROL, vec![ALICE], vec![], &signature);
		assert_eq!(result, Err(PermissionError::InvalidSignature));
	}

	#[test]
	fn test_replay_is_idempotent() {
		let mut set = wedding();
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE, BOB], &[DEV]);

		set.delegated_set(CAROL, vec![ALICE, BOB], vec![DEV], &signature)
			.unwrap();
		let first = (set.whitelist().to_vec(), set.blacklist().to_vec());

		set.delegated_set(CAROL, vec![ALICE, BOB], vec![DEV], &signature)
			.unwrap();
		assert_eq!((set.whitelist().to_vec(), set.blacklist().to_vec()), first);
	}

	#[test]
	fn test_update_replaces_rather_than_merges() {
		let mut set = wedding();

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE, BOB], &[]);
		set.delegated_set(CAROL, vec![ALICE, BOB], vec![], &signature)
			.unwrap();

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[], &[ALICE]);
		set.delegated_set(CAROL, vec![], vec![ALICE], &signature)
			.unwrap();

		assert!(set.whitelist().is_empty());
		assert_eq!(set.blacklist(), &[ALICE]);
	}

	#[test]
	fn test_failed_update_keeps_previous_state() {
		let mut set = wedding();
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[BOB]);
		set.delegated_set(CAROL, vec![ALICE], vec![BOB], &signature)
			.unwrap();

		let forged = sign_for(&set, BOB_KEY, CAROL, &[BOB], &[]);
		assert!(set
			.delegated_set(CAROL, vec![BOB], vec![], &forged)
			.is_err());

		assert_eq!(set.whitelist(), &[ALICE]);
		assert_eq!(set.blacklist(), &[BOB]);
	}

	#[test]
	fn test_preserve_policy_stores_duplicates() {
		let mut set = wedding();
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE, ALICE], &[ALICE]);

		set.delegated_set(CAROL, vec![ALICE, ALICE], vec![ALICE], &signature)
			.unwrap();
		assert_eq!(set.whitelist(), &[ALICE, ALICE]);
		assert_eq!(set.blacklist(), &[ALICE]);
	}

	#[test]
	fn test_deduplicate_policy_collapses_after_verification() {
		let mut set = wedding().with_policy(MembershipPolicy::Deduplicate);
		// The signature covers the list as submitted, duplicates included.
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE, BOB, ALICE], &[]);

		let update = set
			.delegated_set(CAROL, vec![ALICE, BOB, ALICE], vec![], &signature)
			.unwrap();
		assert_eq!(update.whitelist, vec![ALICE, BOB]);
		assert_eq!(set.whitelist(), &[ALICE, BOB]);
	}

	#[test]
	fn test_strict_policy_rejects_overlap_without_mutation() {
		let mut set = wedding().with_policy(MembershipPolicy::Strict);
		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[ALICE]);

		let result = set.delegated_set(CAROL, vec![ALICE], vec![ALICE], &signature);
		assert!(matches!(result, Err(PermissionError::InvalidMembership(_))));
		assert!(set.whitelist().is_empty());
		assert!(set.blacklist().is_empty());
	}

	#[test]
	fn test_strict_policy_checks_authority_first() {
		let mut set = wedding().with_policy(MembershipPolicy::Strict);
		let signature = sign_for(&set, BOB_KEY, CAROL, &[ALICE], &[ALICE]);

		let result = set.delegated_set(CAROL, vec![ALICE], vec![ALICE], &signature);
		assert_eq!(result, Err(PermissionError::Unauthorized { signer: BOB }));
	}

	#[test]
	fn test_verifier_receives_instance_digest() {
		let set = wedding();
		let request = PermissionRequest::new(CAROL, vec![ALICE], vec![]);
		let expected = typed_data_digest(set.domain(), &request);
		assert_eq!(set.digest_for(CAROL, &[ALICE], &[]), expected);

		let mut verifier = MockSignatureVerifier::new();
		verifier
			.expect_recover()
			.withf(move |digest, _| *digest == expected)
			.times(1)
			.returning(|_, _| Ok(CAROL));

		let mut set = set.with_verifier(Box::new(verifier));
		let signature = SignatureParts::new(27, keccak256(b"r"), keccak256(b"s"));
		set.delegated_set(CAROL, vec![ALICE], vec![], &signature)
			.unwrap();
		assert_eq!(set.whitelist(), &[ALICE]);
	}

	#[test]
	fn test_verifier_error_propagates_as_invalid_signature() {
		let mut verifier = MockSignatureVerifier::new();
		verifier
			.expect_recover()
			.with(always(), always())
			.returning(|_, _| Err(AuthError::InvalidSignature));

		let mut set = wedding().with_verifier(Box::new(verifier));
		let signature = SignatureParts::new(27, B256::ZERO, B256::ZERO);

		let result = set.delegated_set(CAROL, vec![ALICE], vec![], &signature);
		assert_eq!(result, Err(PermissionError::InvalidSignature));
		assert!(set.whitelist().is_empty());
	}

	#[tokio::test]
	async fn test_success_publishes_membership_changed() {
		let events = EventBus::new(8);
		let mut receiver = events.subscribe();
		let mut set = wedding().with_event_bus(events);

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[BOB]);
		set.delegated_set(CAROL, vec![ALICE], vec![BOB], &signature)
			.unwrap();

		assert_eq!(
			receiver.recv().await.unwrap(),
			PermissionEvent::MembershipChanged {
				instance: set.address(),
				whitelist: vec![ALICE],
				blacklist: vec![BOB],
			}
		);
	}

	#[tokio::test]
	async fn test_rejection_publishes_update_rejected() {
		let events = EventBus::new(8);
		let mut receiver = events.subscribe();
		let mut set = wedding().with_event_bus(events);

		let signature = sign_for(&set, BOB_KEY, BOB, &[BOB], &[]);
		assert!(set
			.delegated_set(BOB, vec![BOB], vec![], &signature)
			.is_err());

		match receiver.recv().await.unwrap() {
			PermissionEvent::UpdateRejected {
				instance,
				caller,
				reason,
			} => {
				assert_eq!(instance, set.address());
				assert_eq!(caller, BOB);
				assert!(reason.contains("not the authority"));
			},
			other => panic!("unexpected event: {other:?}"),
		}
	}

	#[test]
	fn test_publishing_without_subscribers_does_not_fail_update() {
		let mut set = wedding().with_event_bus(EventBus::new(1));

		let signature = sign_for(&set, CAROL_KEY, CAROL, &[ALICE], &[]);
		assert!(set
			.delegated_set(CAROL, vec![ALICE], vec![], &signature)
			.is_ok());
	}

	#[test]
	fn test_instances_are_independent() {
		let mut wedding = wedding();
		let mut party = PermissionedSet::new(&ChainContext::deploy(31337, DEV, 1), "Party", BOB);

		let signature = sign_for(&wedding, CAROL_KEY, CAROL, &[ALICE], &[]);
		wedding
			.delegated_set(CAROL, vec![ALICE], vec![], &signature)
			.unwrap();

		let signature = sign_for(&party, BOB_KEY, BOB, &[], &[ALICE]);
		party
			.delegated_set(BOB, vec![], vec![ALICE], &signature)
			.unwrap();

		assert_eq!(wedding.whitelist(), &[ALICE]);
		assert!(wedding.blacklist().is_empty());
		assert!(party.whitelist().is_empty());
		assert_eq!(party.blacklist(), &[ALICE]);
	}
}
