use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn make_query(domain: &str, record_type: RecordType) -> Message {
    let mut query = Query::new();
    query.set_name(name(domain));
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(4242, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

/// Reply to `request` with one A record per address.
pub fn answer_for(request: &Message, ttl: u32, ips: &[Ipv4Addr]) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_recursion_available(true);
    for query in request.queries() {
        reply.add_query(query.clone());
    }
    if let Some(query) = request.queries().first() {
        for ip in ips {
            reply.add_answer(Record::from_rdata(
                query.name().clone(),
                ttl,
                RData::A(A(*ip)),
            ));
        }
    }
    reply
}
