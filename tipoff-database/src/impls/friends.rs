use crate::backend::PatchOp;
use crate::error::FriendError;
use crate::impls::profiles::resolve_friend_code;
use crate::store::Store;

/// Validate and send a friend request. Returns the resolved target id.
///
/// The two writes land on different user documents and the store gives no
/// cross-document transaction, so they are issued as separate idempotent
/// patches: re-running after a half-applied failure converges instead of
/// duplicating entries.
pub async fn send_request(
    store: &Store,
    from_id: &str,
    raw_code: &str,
) -> Result<String, FriendError> {
    let target_id = resolve_friend_code(store, raw_code)
        .await?
        .ok_or(FriendError::NotFound)?;

    if target_id == from_id {
        return Err(FriendError::SelfRequest);
    }

    let docs = store.docs();
    let friends = docs.set_members(&store.friends_key(from_id)).await?;
    if friends.contains(&target_id) {
        return Err(FriendError::AlreadyFriends);
    }
    let outgoing = docs.set_members(&store.requests_out_key(from_id)).await?;
    if outgoing.contains(&target_id) {
        return Err(FriendError::AlreadySent);
    }

    docs.apply(&[PatchOp::SetAdd {
        key: store.requests_out_key(from_id),
        member: target_id.clone(),
    }])
    .await?;
    docs.apply(&[PatchOp::SetAdd {
        key: store.requests_in_key(&target_id),
        member: from_id.to_owned(),
    }])
    .await?;

    Ok(target_id)
}

/// Turn a pending request into a friendship on both sides. Both directions of
/// the pair are cleared: two users may have requested each other, and once
/// they are friends no request entry between them may survive. No presence
/// precondition: each half is a pure set-union/set-difference patch, so a
/// retry after partial failure is a no-op on the half that already landed.
pub async fn accept_request(
    store: &Store,
    self_id: &str,
    requester_id: &str,
) -> anyhow::Result<()> {
    if self_id == requester_id {
        return Ok(());
    }

    let docs = store.docs();
    docs.apply(&[
        PatchOp::SetRemove {
            key: store.requests_in_key(self_id),
            member: requester_id.to_owned(),
        },
        PatchOp::SetRemove {
            key: store.requests_out_key(self_id),
            member: requester_id.to_owned(),
        },
        PatchOp::SetAdd {
            key: store.friends_key(self_id),
            member: requester_id.to_owned(),
        },
    ])
    .await?;
    docs.apply(&[
        PatchOp::SetRemove {
            key: store.requests_out_key(requester_id),
            member: self_id.to_owned(),
        },
        PatchOp::SetRemove {
            key: store.requests_in_key(requester_id),
            member: self_id.to_owned(),
        },
        PatchOp::SetAdd {
            key: store.friends_key(requester_id),
            member: self_id.to_owned(),
        },
    ])
    .await?;

    Ok(())
}

/// Drop a pending request without forming a friendship.
pub async fn decline_request(
    store: &Store,
    self_id: &str,
    requester_id: &str,
) -> anyhow::Result<()> {
    let docs = store.docs();
    docs.apply(&[PatchOp::SetRemove {
        key: store.requests_in_key(self_id),
        member: requester_id.to_owned(),
    }])
    .await?;
    docs.apply(&[PatchOp::SetRemove {
        key: store.requests_out_key(requester_id),
        member: self_id.to_owned(),
    }])
    .await?;

    Ok(())
}

/// Symmetric delete from both friends sets.
pub async fn remove_friend(store: &Store, self_id: &str, other_id: &str) -> anyhow::Result<()> {
    let docs = store.docs();
    docs.apply(&[PatchOp::SetRemove {
        key: store.friends_key(self_id),
        member: other_id.to_owned(),
    }])
    .await?;
    docs.apply(&[PatchOp::SetRemove {
        key: store.friends_key(other_id),
        member: self_id.to_owned(),
    }])
    .await?;

    Ok(())
}
