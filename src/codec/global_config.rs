use super::{check_discriminator, read_pubkey, read_u64_le, require_len};
use crate::consts::{GLOBAL_CONFIG_DISCRIMINATOR, PROTOCOL_FEE_RECIPIENTS_LEN};
use crate::errors::CodecError;
use solana_sdk::pubkey::Pubkey;

/// Decoded `GlobalConfig` account (spec §3, §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub admin: Pubkey,
    pub lp_fee_bps: u64,
    pub protocol_fee_bps: u64,
    pub disable_flags: u8,
    pub protocol_fee_recipients: [Pubkey; PROTOCOL_FEE_RECIPIENTS_LEN],
}

impl GlobalConfig {
    /// The first non-zero protocol fee recipient, or `None` if every slot
    /// is unused (spec §4.5 step 2).
    pub fn first_protocol_fee_recipient(&self) -> Option<Pubkey> {
        self.protocol_fee_recipients
            .iter()
            .copied()
            .find(|key| *key != Pubkey::default())
    }
}

/// Parses a `GlobalConfig` account's raw data (spec §4.1).
pub fn parse_global_config(data: &[u8]) -> Result<GlobalConfig, CodecError> {
    let mut offset = check_discriminator(data, GLOBAL_CONFIG_DISCRIMINATOR)?;
    require_len(data, offset + 32 + 8 + 8 + 1 + 32 * PROTOCOL_FEE_RECIPIENTS_LEN)?;

    let admin = read_pubkey(data, offset);
    offset += 32;
    let lp_fee_bps = read_u64_le(data, offset);
    offset += 8;
    let protocol_fee_bps = read_u64_le(data, offset);
    offset += 8;
    let disable_flags = data[offset];
    offset += 1;

    let mut protocol_fee_recipients = [Pubkey::default(); PROTOCOL_FEE_RECIPIENTS_LEN];
    for recipient in protocol_fee_recipients.iter_mut() {
        *recipient = read_pubkey(data, offset);
        offset += 32;
    }

    Ok(GlobalConfig {
        admin,
        lp_fee_bps,
        protocol_fee_bps,
        disable_flags,
        protocol_fee_recipients,
    })
}

/// Encodes a `GlobalConfig` back into its on-chain byte layout. Used by
/// the round-trip codec tests (spec §8 item 2); production code never
/// needs to write this account.
pub fn encode_global_config(config: &GlobalConfig) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + 32 + 8 + 8 + 1 + 32 * PROTOCOL_FEE_RECIPIENTS_LEN);
    out.extend_from_slice(&GLOBAL_CONFIG_DISCRIMINATOR);
    out.extend_from_slice(config.admin.as_ref());
    out.extend_from_slice(&config.lp_fee_bps.to_le_bytes());
    out.extend_from_slice(&config.protocol_fee_bps.to_le_bytes());
    out.push(config.disable_flags);
    for recipient in &config.protocol_fee_recipients {
        out.extend_from_slice(recipient.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> GlobalConfig {
        let mut recipients = [Pubkey::default(); PROTOCOL_FEE_RECIPIENTS_LEN];
        recipients[0] = Pubkey::new_unique();
        GlobalConfig {
            admin: Pubkey::new_unique(),
            lp_fee_bps: 25,
            protocol_fee_bps: 5,
            disable_flags: crate::consts::disable_flags::BUY,
            protocol_fee_recipients: recipients,
        }
    }

    #[test]
    fn round_trips_through_encode_and_parse() {
        let config = sample_config();
        let encoded = encode_global_config(&config);
        let parsed = parse_global_config(&encoded).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let mut encoded = encode_global_config(&sample_config());
        encoded[0] ^= 0xFF;
        let err = parse_global_config(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::BadDiscriminator { .. }));
    }

    #[test]
    fn rejects_short_data() {
        let err = parse_global_config(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, CodecError::ShortData { .. }));
    }

    #[test]
    fn first_protocol_fee_recipient_skips_zero_slots() {
        let config = sample_config();
        assert_eq!(
            config.first_protocol_fee_recipient(),
            Some(config.protocol_fee_recipients[0])
        );

        let empty = GlobalConfig {
            protocol_fee_recipients: [Pubkey::default(); PROTOCOL_FEE_RECIPIENTS_LEN],
            ..config
        };
        assert_eq!(empty.first_protocol_fee_recipient(), None);
    }
}
