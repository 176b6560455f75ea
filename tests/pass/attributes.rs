use regextract::*;

#[derive(Extract, Debug, PartialEq)]
#[extract(pattern = r"(?<user>\w+)@(?<host>[\w.]+)", flags = "i")]
struct Mail {
    user: String,
    host: String,
    #[extract(default = 25)]
    port: u16,
}

#[derive(Extract, Debug, PartialEq)]
#[extract(rename_all = "SCREAMING-KEBAB-CASE")]
enum Kind {
    DirectMessage,
    #[extract(rename = "LIST")]
    MailingList,
    #[extract(default)]
    Unknown,
}

#[derive(Extract)]
#[extract(by_name)]
struct Header {
    r#type: Kind,
    #[extract(rename = "to")]
    recipient: Mail,
}

fn main() {
    let mail: Mail = extract_default("bob@example.org").unwrap();
    assert_eq!(mail.port, 25);

    let header: Header = extract(
        "DIRECT-MESSAGE to a@b",
        r"(?<type>[\w-]+) to (?<to>(?<user>\w+)@(?<host>\w+))",
    )
    .unwrap();
    assert_eq!(header.r#type, Kind::DirectMessage);
    assert_eq!(header.recipient.host, "b");
}
