/// CLABE institution prefix to SPEI participant code, sorted by prefix.
pub(crate) const BANK_CODES: &[(&str, &str)] = &[
    ("002", "40002"), // BANAMEX
    ("006", "37006"), // BANCOMEXT
    ("009", "37009"), // BANOBRAS
    ("012", "40012"), // BBVA BANCOMER
    ("014", "40014"), // SANTANDER
    ("019", "37019"), // BANJERCITO
    ("021", "40021"), // HSBC
    ("030", "40030"), // BAJIO
    ("032", "40032"), // IXE
    ("036", "40036"), // INBURSA
    ("037", "40037"), // INTERACCIONES
    ("042", "40042"), // MIFEL
    ("044", "40044"), // SCOTIABANK
    ("058", "40058"), // BANREGIO
    ("059", "40059"), // INVEX
    ("060", "40060"), // BANSI
    ("062", "40062"), // AFIRME
    ("072", "40072"), // BANORTE
    ("102", "40102"), // THE ROYAL BANK
    ("103", "40103"), // AMERICAN EXPRESS
    ("106", "40106"), // BAMSA
    ("108", "40108"), // TOKYO
    ("110", "40110"), // JP MORGAN
    ("112", "40112"), // BMONEX
    ("113", "40113"), // VE POR MAS
    ("116", "40116"), // ING
    ("124", "40124"), // DEUTSCHE
    ("126", "40126"), // CREDIT SUISSE
    ("127", "40127"), // AZTECA
    ("128", "40128"), // AUTOFIN
    ("129", "40129"), // BARCLAYS
    ("130", "40130"), // COMPARTAMOS
    ("131", "40131"), // BANCO FAMSA
    ("132", "40132"), // BMULTIVA
    ("133", "40133"), // ACTINVER
    ("134", "40134"), // WAL-MART
    ("135", "37135"), // NAFIN
    ("136", "40136"), // INTERBANCO
    ("137", "40137"), // BANCOPPEL
    ("138", "40138"), // ABC CAPITAL
    ("139", "40139"), // UBS BANK
    ("140", "40140"), // CONSUBANCO
    ("141", "40141"), // VOLKSWAGEN
    ("143", "40143"), // CIBANCO
    ("145", "40145"), // BBASE
    ("147", "40147"), // BANKAOOL
    ("148", "40148"), // PAGATODO
    ("149", "40149"), // FORJADORES
    ("150", "40150"), // INMOBILIARIO
    ("151", "40151"), // DONDE
    ("152", "40152"), // BANCREA
    ("153", "40153"), // PROGRESO
    ("154", "40154"), // BANCO FINTERRA
    ("155", "40155"), // ICBC
    ("156", "40156"), // SABADELL
    ("157", "40157"), // SHINHAN
    ("158", "40158"), // MIZUHO BANK
    ("160", "40160"), // BANCO S3
    ("166", "37166"), // BANSEFI
    ("168", "37168"), // HIPOTECARIA FEDERAL
    ("600", "90600"), // MONEXCB
    ("601", "90601"), // GBM
    ("602", "90602"), // MASARI
    ("605", "90605"), // VALUE
    ("606", "90606"), // ESTRUCTURADORES
    ("607", "90607"), // TIBER
    ("608", "90608"), // VECTOR
    ("610", "90610"), // B&B
    ("614", "90614"), // ACCIVAL
    ("615", "90615"), // MERRILL LYNCH
    ("616", "90616"), // FINAMEX
    ("617", "90617"), // VALMEX
    ("618", "90618"), // UNICA
    ("619", "90619"), // MAPFRE
    ("620", "90620"), // PROFUTURO
    ("621", "90621"), // CB ACTINVER
    ("622", "90622"), // OACTIN
    ("623", "90623"), // SKANDIA
    ("626", "90626"), // CBDEUTSCHE
    ("627", "90627"), // ZURICH
    ("628", "90628"), // ZURICHVI
    ("629", "90629"), // SU CASITA
    ("630", "90630"), // CB INTERCAM
    ("631", "90631"), // CI BOLSA
    ("632", "90632"), // BULLTICK CB
    ("633", "90633"), // STERLING
    ("634", "90634"), // FINCOMUN
    ("636", "90636"), // HDI SEGUROS
    ("637", "90637"), // ORDER
    ("638", "90638"), // AKALA
    ("640", "90640"), // CB JPMORGAN
    ("642", "90642"), // REFORMA
    ("646", "90646"), // STP
    ("647", "90647"), // TELECOMM
    ("648", "90648"), // EVERCORE
    ("649", "90649"), // SKANDIA
    ("651", "90651"), // SEGMTY
    ("652", "90652"), // ASEA
    ("653", "90653"), // KUSPIT
    ("655", "90655"), // SOFIEXPRESS
    ("656", "90656"), // UNAGRA
    ("659", "90659"), // OPCIONES EMPRESARIALES DEL NOROESTE
    ("670", "90670"), // LIBERTAD
    ("901", "90901"), // CLS
    ("902", "90902"), // INDEVAL
];
