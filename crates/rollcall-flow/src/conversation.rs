// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event dialogue state machine.
//!
//! [`Conversation`] owns no session state. Each handler reads what it needs
//! from the inbound SMS, the [`StageContext`] decoded from the callback URL,
//! and the messaging provider, then sends the next message with the next
//! stage's context baked into its reply callback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rollcall_core::{
    DecisionJob, DecisionScheduler, MessageId, MessageRecord, MessagingProvider, Recipient,
    Response, ResponseLookup, ResponseQuery, RollcallError,
};
use tracing::{debug, info, warn};

use crate::classify::{Decision, is_keyword_reply, is_rsvp_reply, normalize, strip_nondigits};
use crate::deadline::DeadlineResolver;
use crate::donation::DonationEvent;
use crate::messages;
use crate::stage::{CallbackUrls, InboundSms, Stage, StageContext};
use crate::tally::{Audience, Tally, collect_counts, decision_audience, nudge_audience};

/// Source of "now". Swapped out in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Settings the conversation needs from configuration.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// Base URL reply callbacks point at.
    pub public_url: String,
    pub deadlines: DeadlineResolver,
    pub response_lookup: ResponseLookup,
    /// Receives donation notifications.
    pub admin_mobile: Option<String>,
}

/// Stage handlers over a messaging provider and a decision scheduler.
#[derive(Clone)]
pub struct Conversation {
    provider: Arc<dyn MessagingProvider>,
    scheduler: Arc<dyn DecisionScheduler>,
    callbacks: CallbackUrls,
    deadlines: DeadlineResolver,
    response_lookup: ResponseLookup,
    admin_mobile: Option<String>,
    clock: Clock,
}

impl Conversation {
    pub fn new(
        provider: Arc<dyn MessagingProvider>,
        scheduler: Arc<dyn DecisionScheduler>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            provider,
            scheduler,
            callbacks: CallbackUrls::new(&settings.public_url),
            deadlines: settings.deadlines,
            response_lookup: settings.response_lookup,
            admin_mobile: settings.admin_mobile,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for deadlines and status replies.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Route an inbound SMS to the handler for `stage`.
    pub async fn handle(
        &self,
        stage: Stage,
        sms: &InboundSms,
        context: &StageContext,
    ) -> Result<(), RollcallError> {
        debug!(stage = %stage, from = %sms.mobile, "handling inbound SMS");
        match stage {
            Stage::Start => self.start(sms).await,
            Stage::ListSelection => self.select_list(sms).await,
            Stage::DetailsCollection => self.collect_details(sms, context).await,
            Stage::Status => self.status(sms).await,
            Stage::Nudge => self.nudge(sms).await,
            Stage::Decision => self.decide(sms, context).await,
            Stage::CatchAll => self.catch_all(sms, context).await,
        }
    }

    /// Ask the creator which distribution list the event goes to.
    pub async fn start(&self, sms: &InboundSms) -> Result<(), RollcallError> {
        let lists = self.provider.list_distribution_lists().await?;
        let body = messages::list_prompt(lists.iter().map(|list| list.name.as_str()));
        let callback = self.callback(Stage::ListSelection, &StageContext::default())?;
        self.provider
            .send_message(&body, &sms.mobile, Some(&callback))
            .await?;
        info!(creator = %sms.mobile, lists = lists.len(), "sent list prompt");
        Ok(())
    }

    /// Match the reply to a list name, then ask for event details.
    pub async fn select_list(&self, sms: &InboundSms) -> Result<(), RollcallError> {
        let wanted = normalize(&sms.response);
        let lists = self.provider.list_distribution_lists().await?;
        let Some(list) = lists.iter().find(|list| list.name.to_lowercase() == wanted) else {
            debug!(reply = %sms.response, "no list matches reply");
            let callback = self.callback(Stage::ListSelection, &StageContext::default())?;
            self.provider
                .send_message(messages::NO_LIST_MATCH, &sms.mobile, Some(&callback))
                .await?;
            return Ok(());
        };

        let context = StageContext::for_details(&list.id, &sms.mobile);
        let callback = self.callback(Stage::DetailsCollection, &context)?;
        self.provider
            .send_message(messages::DETAILS_PROMPT, &sms.mobile, Some(&callback))
            .await?;
        info!(creator = %sms.mobile, list_id = %list.id, "list selected");
        Ok(())
    }

    /// Broadcast the RSVP prompt, confirm to the creator and schedule the
    /// decision trigger.
    pub async fn collect_details(
        &self,
        sms: &InboundSms,
        context: &StageContext,
    ) -> Result<(), RollcallError> {
        let (Some(list_id), Some(creator)) = (
            context.selected_list_id.as_deref(),
            context.event_creator.as_deref(),
        ) else {
            return Err(RollcallError::InvalidInput(
                "details reply without selected_list_id and event_creator".to_string(),
            ));
        };

        let fields: Vec<&str> = sms.response.split(';').map(str::trim).collect();
        if fields.len() < 3 {
            debug!(fields = fields.len(), "incomplete event details, prompting again");
            let callback = self.callback(Stage::DetailsCollection, context)?;
            self.provider
                .send_message(messages::DETAILS_PROMPT, &sms.mobile, Some(&callback))
                .await?;
            return Ok(());
        }
        let (subject, when, location) = (fields[0], fields[1], fields[2]);
        let deadline_text = fields.get(3).copied();

        let phrase = self.deadlines.normalize_phrase(deadline_text, self.now());
        let body = messages::rsvp_prompt(subject, when, location, &phrase);
        let callback = self.callback(Stage::CatchAll, &StageContext::for_broadcast(creator))?;
        let sent = self
            .provider
            .send_message_to_list(list_id, &body, Some(&callback))
            .await?;
        info!(message_id = %sent.message_id, list_id, "event broadcast sent");

        self.provider
            .send_message(&messages::creator_confirmation(&sent.message_id), creator, None)
            .await?;

        // Resolved against the send time so a later STATUS re-derives the same instant.
        let fire_at = self.deadlines.resolve(Some(&phrase), sent.sent_at);
        let job = DecisionJob {
            message_id: sent.message_id.clone(),
            selected_list_id: list_id.to_string(),
            send_to: creator.to_string(),
        };
        self.scheduler.schedule(fire_at, job).await?;
        info!(message_id = %sent.message_id, %fire_at, "decision trigger scheduled");
        Ok(())
    }

    /// Reply with the headcount and the time left (or elapsed) on the deadline.
    pub async fn status(&self, sms: &InboundSms) -> Result<(), RollcallError> {
        let Some(message_id) = event_id_in(&sms.response) else {
            return self.ask_for_event_id(&sms.mobile, "STATUS").await;
        };

        let message = self.provider.get_message(&message_id).await?;
        let tally = collect_counts(&self.responses_for(&message).await?);
        let deadline = self
            .deadlines
            .resolve_for_status_query(&message.body, message.sent_at);

        let now = self.now();
        let body = if deadline > now {
            messages::status_open(&message_id, tally, deadline - now)
        } else {
            messages::status_closed(&message_id, tally, now - deadline)
        };
        self.provider.send_message(&body, &sms.mobile, None).await?;
        info!(%message_id, in_count = tally.in_count, out_count = tally.out_count, "status sent");
        Ok(())
    }

    /// Re-send the RSVP prompt to recipients who have not replied.
    pub async fn nudge(&self, sms: &InboundSms) -> Result<(), RollcallError> {
        let Some(message_id) = event_id_in(&sms.response) else {
            return self.ask_for_event_id(&sms.mobile, "NUDGE").await;
        };

        let message = self.provider.get_message(&message_id).await?;
        let (recipients, responses) = self.recipients_and_responses(&message).await?;
        let audience = nudge_audience(&recipients, &responses);

        if !audience.is_empty() {
            let callback =
                self.callback(Stage::CatchAll, &StageContext::for_broadcast(&sms.mobile))?;
            self.provider
                .send_message(&message.body, &audience.to_recipient_string(), Some(&callback))
                .await?;
        }
        self.provider
            .send_message(
                &messages::nudge_confirmation(&message_id, audience.len()),
                &sms.mobile,
                None,
            )
            .await?;
        info!(%message_id, nudged = audience.len(), "nudge sent");
        Ok(())
    }

    /// Trigger fired: ask the creator for a decision with a fresh tally.
    pub async fn prompt_decision(&self, job: &DecisionJob) -> Result<(), RollcallError> {
        let tally = self.tally_for(&job.message_id).await?;
        let context = StageContext::for_decision(
            &job.selected_list_id,
            &job.message_id,
            tally.in_count,
            &job.send_to,
        );
        let callback = self.callback(Stage::Decision, &context)?;
        self.provider
            .send_message(
                &messages::decision_prompt(tally, &job.message_id),
                &job.send_to,
                Some(&callback),
            )
            .await?;
        info!(message_id = %job.message_id, creator = %job.send_to, "decision prompt sent");
        Ok(())
    }

    /// Broadcast the creator's decision to everyone who has not backed out.
    ///
    /// Replies that are not a decision phrase are ignored.
    pub async fn decide(
        &self,
        sms: &InboundSms,
        context: &StageContext,
    ) -> Result<(), RollcallError> {
        let Some(decision) = Decision::parse(&sms.response) else {
            debug!(reply = %sms.response, "not a decision reply, ignoring");
            return Ok(());
        };

        let message_id = context
            .event_message_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(MessageId::from)
            .or_else(|| event_id_in(&sms.response));
        let Some(message_id) = message_id else {
            return self
                .ask_for_event_id(&sms.mobile, decision.phrase())
                .await;
        };

        let message = self.provider.get_message(&message_id).await?;
        let (recipients, responses) = self.recipients_and_responses(&message).await?;
        let in_count = match context.in_count {
            Some(count) => count,
            None => collect_counts(&responses).in_count,
        };
        let audience = decision_audience(&recipients, &responses);
        if audience.is_empty() {
            info!(%message_id, "decision audience is empty, nothing to send");
            return Ok(());
        }

        let creator = context.event_creator.as_deref().unwrap_or(&sms.mobile);
        let callback = self.callback(Stage::CatchAll, &StageContext::for_broadcast(creator))?;
        self.provider
            .send_message(
                &messages::decision_announcement(decision, in_count),
                &audience.to_recipient_string(),
                Some(&callback),
            )
            .await?;
        info!(%message_id, ?decision, recipients = audience.len(), "decision broadcast sent");
        Ok(())
    }

    /// Relay free text between a broadcast recipient and the event creator.
    ///
    /// Empty bodies, keywords and RSVP replies are handled elsewhere (or by
    /// the provider) and are dropped here.
    pub async fn catch_all(
        &self,
        sms: &InboundSms,
        context: &StageContext,
    ) -> Result<(), RollcallError> {
        let body = sms.response.as_str();
        if body.trim().is_empty() || is_keyword_reply(body) || is_rsvp_reply(body) {
            debug!(reply = %body, "catch-all ignoring reply");
            return Ok(());
        }

        let relay_back = StageContext::for_relay(&sms.mobile);
        let callback = self.callback(Stage::CatchAll, &relay_back)?;

        if context.is_catch_all_reply {
            let Some(to) = context.send_response_to.as_deref() else {
                warn!(from = %sms.mobile, "relay reply without send_response_to, dropping");
                return Ok(());
            };
            self.provider.send_message(body, to, Some(&callback)).await?;
            info!(from = %sms.mobile, to, "relayed reply");
        } else {
            let Some(creator) = context.event_creator.as_deref() else {
                warn!(from = %sms.mobile, "catch-all reply without event_creator, dropping");
                return Ok(());
            };
            self.provider
                .send_message(&messages::relay_wrapper(body), creator, Some(&callback))
                .await?;
            info!(from = %sms.mobile, creator, "forwarded reply to event creator");
        }
        Ok(())
    }

    /// Tell the admin about a completed donation.
    pub async fn notify_donation(&self, event: &DonationEvent) -> Result<(), RollcallError> {
        let Some(text) = event.notification() else {
            debug!(event_type = %event.event_type, "ignoring payment event");
            return Ok(());
        };
        let Some(admin) = self.admin_mobile.as_deref() else {
            warn!("donation received but no admin mobile is configured");
            return Ok(());
        };
        self.provider.send_message(&text, admin, None).await?;
        info!("donation notification sent");
        Ok(())
    }

    /// Fresh IN/OUT counts for an event.
    pub async fn tally_for(&self, message_id: &MessageId) -> Result<Tally, RollcallError> {
        let responses = match self.response_lookup {
            ResponseLookup::MessageId => {
                self.provider
                    .list_responses(&ResponseQuery::ForMessage(message_id.clone()))
                    .await?
            }
            ResponseLookup::SinceSent => {
                let message = self.provider.get_message(message_id).await?;
                self.responses_for(&message).await?
            }
        };
        Ok(collect_counts(&responses))
    }

    /// Recipients minus anyone whose latest RSVP is OUT.
    pub async fn decision_audience(&self, message_id: &MessageId) -> Result<Audience, RollcallError> {
        let message = self.provider.get_message(message_id).await?;
        let (recipients, responses) = self.recipients_and_responses(&message).await?;
        Ok(decision_audience(&recipients, &responses))
    }

    /// Recipients who have sent no RSVP reply.
    pub async fn nudge_audience(&self, message_id: &MessageId) -> Result<Audience, RollcallError> {
        let message = self.provider.get_message(message_id).await?;
        let (recipients, responses) = self.recipients_and_responses(&message).await?;
        Ok(nudge_audience(&recipients, &responses))
    }

    async fn responses_for(&self, message: &MessageRecord) -> Result<Vec<Response>, RollcallError> {
        let query = match self.response_lookup {
            ResponseLookup::MessageId => ResponseQuery::ForMessage(message.id.clone()),
            ResponseLookup::SinceSent => ResponseQuery::Window {
                start: message.sent_at,
                end: None,
            },
        };
        self.provider.list_responses(&query).await
    }

    async fn recipients_and_responses(
        &self,
        message: &MessageRecord,
    ) -> Result<(Vec<Recipient>, Vec<Response>), RollcallError> {
        let recipients = self.provider.list_recipients(&message.id).await?;
        let responses = self.responses_for(message).await?;
        Ok((recipients, responses))
    }

    async fn ask_for_event_id(&self, to: &str, command: &str) -> Result<(), RollcallError> {
        debug!(from = %to, command, "command without an event id");
        self.provider
            .send_message(&messages::missing_event_id(command), to, None)
            .await?;
        Ok(())
    }

    fn callback(&self, stage: Stage, context: &StageContext) -> Result<String, RollcallError> {
        self.callbacks.url(stage, context)
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// The numeric event id in a command body, if any.
fn event_id_in(text: &str) -> Option<MessageId> {
    let digits = strip_nondigits(text);
    (!digits.is_empty()).then(|| MessageId(digits))
}
