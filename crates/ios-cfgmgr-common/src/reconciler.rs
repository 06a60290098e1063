//! The reconcile cycle shared by every entity kind.
//!
//! Create and update have the same shape:
//!
//! 1. check the key and convert the desired record with the kind's
//!    Attribute Codec (fails before any device I/O)
//! 2. read and parse the running config, locate the entity by key
//! 3. build the target on top of the prior record, then marshal it if
//!    absent or diff prior and target if present
//! 4. filter the lines and submit them as one batch (skipped when empty)
//! 5. re-read, re-locate and convert back; the device's view is the result
//!
//! Every operation does one read, at most one batch and at most one
//! re-read. Nothing is retried or cached between cycles.

use tracing::{debug, info, instrument, warn};

use ios_config_codec::{ConfigCodec, RunningConfig};

use crate::error::CfgMgrResult;
use crate::filter::filter_commands;
use crate::resource::{locate, Resource};
use crate::transport::Transport;

/// Show command used to read the running configuration.
pub const DEFAULT_SHOW_COMMAND: &str = "show running-config";

/// Reconciles entities against one device session.
///
/// The reconciler is the explicit device handle: callers own it and
/// serialize cycles through it.
pub struct Reconciler<T, C> {
    transport: T,
    codec: C,
    show_command: String,
}

impl<T: Transport, C: ConfigCodec> Reconciler<T, C> {
    pub fn new(transport: T, codec: C) -> Self {
        Self {
            transport,
            codec,
            show_command: DEFAULT_SHOW_COMMAND.to_string(),
        }
    }

    /// Overrides the command used to read the running configuration.
    pub fn with_show_command(mut self, show_command: impl Into<String>) -> Self {
        self.show_command = show_command.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Converges the device onto `desired` (create or update).
    ///
    /// Returns the entity as the device reports it afterwards, or `None`
    /// if it is absent after the batch was applied.
    #[instrument(skip(self, desired), fields(kind = R::KIND, key = %R::key(desired)))]
    pub async fn apply<R: Resource>(&self, desired: &R::Desired) -> CfgMgrResult<Option<R::Desired>> {
        let key = R::key(desired);
        R::check_key(&key)?;
        // conversion errors surface here, before any device I/O
        R::to_snapshot(desired, None)?;

        let config = self.read_config().await?;
        let prior = locate::<R>(&config, &key);
        debug!(found = prior.is_some(), "Located entity");
        let target = R::to_snapshot(desired, prior)?;

        let text = match prior {
            None => self.codec.marshal(&target.into())?,
            Some(prior) => self.codec.diff(&prior.clone().into(), &target.into())?,
        };
        let lines = filter_commands(&text);

        if lines.is_empty() {
            // nothing to change, so the first read is still the device state
            debug!("Entity already converged, skipping apply");
            return Ok(prior.map(R::from_snapshot));
        }

        self.transport.configure(&lines).await?;
        info!(lines = lines.len(), "Applied configuration batch");

        let config = self.read_config().await?;
        match locate::<R>(&config, &key) {
            Some(record) => Ok(Some(R::from_snapshot(record))),
            None => {
                warn!("Entity absent after apply");
                Ok(None)
            }
        }
    }

    /// Reads one entity; `None` means it no longer exists on the device.
    #[instrument(skip(self, key), fields(kind = R::KIND, key = %key))]
    pub async fn read<R: Resource>(&self, key: &R::Key) -> CfgMgrResult<Option<R::Desired>> {
        R::check_key(key)?;
        let config = self.read_config().await?;
        let found = locate::<R>(&config, key);
        debug!(found = found.is_some(), "Located entity");
        Ok(found.map(R::from_snapshot))
    }

    /// Removes one entity with its kind's teardown command. No read, no
    /// verification.
    #[instrument(skip(self, key), fields(kind = R::KIND, key = %key))]
    pub async fn delete<R: Resource>(&self, key: &R::Key) -> CfgMgrResult<()> {
        R::check_key(key)?;
        let lines = filter_commands(&R::teardown(key));
        self.transport.configure(&lines).await?;
        info!(lines = lines.len(), "Removed entity");
        Ok(())
    }

    /// Reads every entity of one kind.
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub async fn list<R: Resource>(&self) -> CfgMgrResult<Vec<R::Desired>> {
        let config = self.read_config().await?;
        let entities: Vec<R::Desired> = R::listed(&config)
            .into_iter()
            .map(R::from_snapshot)
            .collect();
        debug!(count = entities.len(), "Listed entities");
        Ok(entities)
    }

    async fn read_config(&self) -> CfgMgrResult<RunningConfig> {
        let text = self.transport.exec(&self.show_command).await?;
        Ok(self.codec.unmarshal(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CfgMgrError;
    use crate::resource::tests::{TestVlan, TestVlanDesired};
    use async_trait::async_trait;
    use ios_config_codec::IosCodec;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted show output and captures configure batches.
    #[derive(Default)]
    struct ScriptedTransport {
        reads: Mutex<VecDeque<String>>,
        execs: Mutex<Vec<String>>,
        batches: Mutex<Vec<Vec<String>>>,
        fail_configure: bool,
    }

    impl ScriptedTransport {
        fn with_reads(reads: &[&str]) -> Self {
            Self {
                reads: Mutex::new(reads.iter().map(|r| r.to_string()).collect()),
                ..Default::default()
            }
        }

        fn exec_count(&self) -> usize {
            self.execs.lock().unwrap().len()
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn exec(&self, command: &str) -> CfgMgrResult<String> {
            self.execs.lock().unwrap().push(command.to_string());
            self.reads
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| CfgMgrError::transport("exec", "no scripted output left"))
        }

        async fn configure(&self, lines: &[String]) -> CfgMgrResult<()> {
            if self.fail_configure {
                return Err(CfgMgrError::transport("configure", "session closed"));
            }
            self.batches.lock().unwrap().push(lines.to_vec());
            Ok(())
        }
    }

    fn desired(id: u16, name: &str) -> TestVlanDesired {
        TestVlanDesired {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_apply_creates_absent_entity() {
        let transport = ScriptedTransport::with_reads(&["", "vlan 10\n name Eng\n!\n"]);
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let result = reconciler.apply::<TestVlan>(&desired(10, "Eng")).await.unwrap();

        assert_eq!(result, Some(desired(10, "Eng")));
        assert_eq!(
            reconciler.transport().batches(),
            vec![vec!["vlan 10".to_string(), "name Eng".to_string()]]
        );
        assert_eq!(reconciler.transport().exec_count(), 2);
    }

    #[tokio::test]
    async fn test_apply_diffs_present_entity() {
        let transport = ScriptedTransport::with_reads(&[
            "vlan 10\n name Old\n!\n",
            "vlan 10\n name New\n!\n",
        ]);
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let result = reconciler.apply::<TestVlan>(&desired(10, "New")).await.unwrap();

        assert_eq!(result, Some(desired(10, "New")));
        assert_eq!(
            reconciler.transport().batches(),
            vec![vec!["vlan 10".to_string(), "name New".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_apply_converged_skips_batch() {
        let transport = ScriptedTransport::with_reads(&["vlan 10\n name Eng\n!\n"]);
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let result = reconciler.apply::<TestVlan>(&desired(10, "Eng")).await.unwrap();

        assert_eq!(result, Some(desired(10, "Eng")));
        assert!(reconciler.transport().batches().is_empty());
        assert_eq!(reconciler.transport().exec_count(), 1);
    }

    #[test]
    fn test_apply_invalid_desired_does_no_io() {
        let reconciler = Reconciler::new(ScriptedTransport::default(), IosCodec::new());

        let err = tokio_test::block_on(reconciler.apply::<TestVlan>(&desired(10, "two\nlines")))
            .unwrap_err();

        assert!(matches!(err, CfgMgrError::InvalidConfiguration { .. }));
        assert_eq!(reconciler.transport().exec_count(), 0);
        assert!(reconciler.transport().batches().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_before_io() {
        let reconciler = Reconciler::new(ScriptedTransport::default(), IosCodec::new());

        let read = reconciler.read::<TestVlan>(&0).await.unwrap_err();
        let delete = reconciler.delete::<TestVlan>(&4095).await.unwrap_err();

        assert!(matches!(read, CfgMgrError::InvalidAddress(_)));
        assert!(matches!(delete, CfgMgrError::InvalidAddress(_)));
        assert_eq!(reconciler.transport().exec_count(), 0);
        assert!(reconciler.transport().batches().is_empty());
    }

    #[tokio::test]
    async fn test_apply_transport_failure_surfaces() {
        let transport = ScriptedTransport {
            fail_configure: true,
            ..ScriptedTransport::with_reads(&[""])
        };
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let err = reconciler.apply::<TestVlan>(&desired(10, "Eng")).await.unwrap_err();

        assert!(err.is_device_side());
        assert_eq!(reconciler.transport().exec_count(), 1);
    }

    #[tokio::test]
    async fn test_apply_absent_after_batch() {
        let transport = ScriptedTransport::with_reads(&["", ""]);
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let result = reconciler.apply::<TestVlan>(&desired(10, "Eng")).await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_read_and_list() {
        let text = "vlan 30\n!\nvlan 10\n name Eng\n!\n";
        let transport = ScriptedTransport::with_reads(&[text, text, text]);
        let reconciler =
            Reconciler::new(transport, IosCodec::new()).with_show_command("show run | section vlan");

        assert_eq!(
            reconciler.read::<TestVlan>(&10).await.unwrap(),
            Some(desired(10, "Eng"))
        );
        assert_eq!(reconciler.read::<TestVlan>(&99).await.unwrap(), None);
        assert_eq!(
            reconciler.list::<TestVlan>().await.unwrap(),
            vec![desired(30, ""), desired(10, "Eng")]
        );
        assert_eq!(
            reconciler.transport().execs.lock().unwrap()[0],
            "show run | section vlan"
        );
    }

    #[tokio::test]
    async fn test_delete_issues_single_teardown() {
        let reconciler = Reconciler::new(ScriptedTransport::default(), IosCodec::new());

        reconciler.delete::<TestVlan>(&10).await.unwrap();

        assert_eq!(
            reconciler.transport().batches(),
            vec![vec!["no vlan 10".to_string()]]
        );
        assert_eq!(reconciler.transport().exec_count(), 0);
    }

    #[tokio::test]
    async fn test_read_codec_error_surfaces() {
        let transport = ScriptedTransport::with_reads(&["vlan 9999\n"]);
        let reconciler = Reconciler::new(transport, IosCodec::new());

        let err = reconciler.read::<TestVlan>(&10).await.unwrap_err();

        assert!(matches!(err, CfgMgrError::Codec(_)));
    }
}
