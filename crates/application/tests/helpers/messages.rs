use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, NS, SOA};
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

pub fn make_response(request: &Message, rcode: ResponseCode) -> Message {
    let mut message = Message::new(request.id(), MessageType::Response, request.op_code());
    message.set_response_code(rcode);
    for query in request.queries() {
        message.add_query(query.clone());
    }
    message
}

pub fn a_record(domain: &str, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(name(domain), ttl, RData::A(A(ip)))
}

pub fn ns_record(zone: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(name(zone), ttl, RData::NS(NS(name(target))))
}

pub fn soa_record(zone: &str, ttl: u32, minimum: u32) -> Record {
    let soa = SOA::new(
        name(&format!("ns1.{}", zone)),
        name(&format!("hostmaster.{}", zone)),
        1,
        3600,
        900,
        604800,
        minimum,
    );
    Record::from_rdata(name(zone), ttl, RData::SOA(soa))
}
